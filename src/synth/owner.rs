//! Resolve the table a call writes to
//!
//! Receivers are followed one step: `self` becomes the owner of the enclosing
//! method header, `local t = X` makes `t` mean `X`, and an alias bound to
//! `FindMetaTable("T")` is the meta table of `T`.

use crate::context::CompiledPatterns;
use crate::scan::is_identifier;

/// Resolved owner of an accessor or networked-field call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner<'a> {
    /// A plain table such as `ENT` or `PANEL`
    Table(&'a str),
    /// The meta table of a built-in type
    Meta(&'a str),
}

const NOT_A_TABLE: &[&str] = &["nil", "true", "false", "not", "function", "self"];

#[derive(Debug, Default)]
pub struct OwnerResolver<'a> {
    /// `(offset, owner)` of `function Owner:Method(` headers
    headers: Vec<(usize, &'a str)>,
    /// `(offset, alias, type)` of meta-table lookups
    metas: Vec<(usize, &'a str, &'a str)>,
    /// `(offset, alias, target)` of `local alias = Target`
    aliases: Vec<(usize, &'a str, &'a str)>,
}

impl<'a> OwnerResolver<'a> {
    pub fn new(text: &'a str, patterns: &CompiledPatterns) -> Self {
        let headers = patterns
            .function_header
            .captures_iter(text)
            .filter_map(|c| Some((c.get(0)?.start(), c.get(1)?.as_str())))
            .collect();

        let metas = patterns
            .meta_table
            .captures_iter(text)
            .filter_map(|c| Some((c.get(0)?.start(), c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect();

        let aliases = patterns
            .any_local_assignment()
            .map(|re| {
                re.captures_iter(text)
                    .filter_map(|c| {
                        let whole = c.get(0)?;
                        let alias = c.name("name")?.as_str();
                        let eq = whole.start() + whole.as_str().find('=')?;
                        let target = assigned_identifier(&text[eq + 1..])?;
                        Some((whole.start(), alias, target))
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            headers,
            metas,
            aliases,
        }
    }

    /// Resolve `token` as seen at byte `at`
    pub fn resolve<'t>(&'t self, token: &'t str, at: usize) -> Option<Owner<'t>> {
        let token = token.trim();
        if !is_identifier(token) {
            return None;
        }

        let direct = if token == "self" {
            self.enclosing_owner(at)?
        } else {
            self.alias_target(token, at).unwrap_or(token)
        };

        match self.meta_type(direct, at) {
            Some(ty) => Some(Owner::Meta(ty)),
            None => Some(Owner::Table(direct)),
        }
    }

    /// Returns true if `token` at `at` resolves to the table `owner`
    pub fn owned_by(&self, token: &str, at: usize, owner: &str) -> bool {
        self.resolve(token, at) == Some(Owner::Table(owner))
    }

    fn enclosing_owner(&self, at: usize) -> Option<&'a str> {
        self.headers
            .iter()
            .rev()
            .find(|(offset, _)| *offset < at)
            .map(|(_, owner)| *owner)
    }

    fn alias_target(&self, token: &str, at: usize) -> Option<&'a str> {
        self.aliases
            .iter()
            .rev()
            .find(|(offset, alias, _)| *offset < at && *alias == token)
            .map(|(_, _, target)| *target)
    }

    fn meta_type(&self, token: &str, at: usize) -> Option<&'a str> {
        self.metas
            .iter()
            .rev()
            .find(|(offset, alias, _)| *offset < at && *alias == token)
            .map(|(_, _, ty)| *ty)
    }
}

/// Right-hand side of an assignment when it is a bare identifier
fn assigned_identifier(rest: &str) -> Option<&str> {
    let line = rest.split('\n').next().unwrap_or("");
    let line = line.split("--").next().unwrap_or("");
    let value = line.trim().trim_end_matches(';').trim_end();
    (is_identifier(value) && !NOT_A_TABLE.contains(&value)).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::context::AnnotatorContext;
    use crate::fs::MemoryFs;

    fn ctx() -> AnnotatorContext {
        AnnotatorContext::new(&Settings::default(), MemoryFs::new()).unwrap()
    }

    #[test]
    fn test_self_resolves_to_method_owner() {
        let text = "function ENT:SetupDataTables()\n  self:NetworkVar(\"Int\", 0, \"Ammo\")\nend\n";
        let ctx = ctx();
        let resolver = OwnerResolver::new(text, &ctx.patterns);
        let at = text.find("self:").unwrap();
        assert_eq!(resolver.resolve("self", at), Some(Owner::Table("ENT")));
        assert!(resolver.owned_by("self", at, "ENT"));
    }

    #[test]
    fn test_self_outside_a_method_is_unresolved() {
        let ctx = ctx();
        let resolver = OwnerResolver::new("self:Foo()", &ctx.patterns);
        assert_eq!(resolver.resolve("self", 0), None);
    }

    #[test]
    fn test_local_alias() {
        let text = "local tab = PANEL -- alias\nAccessorFunc(tab, nil, \"Open\")\n";
        let ctx = ctx();
        let resolver = OwnerResolver::new(text, &ctx.patterns);
        let at = text.find("Accessor").unwrap();
        assert_eq!(resolver.resolve("tab", at), Some(Owner::Table("PANEL")));
        assert_eq!(resolver.resolve("PANEL", at), Some(Owner::Table("PANEL")));
    }

    #[test]
    fn test_meta_table_alias() {
        let text = "local meta = FindMetaTable(\"Player\")\nAccessorFunc(meta, \"k\", \"Rank\")\n";
        let ctx = ctx();
        let resolver = OwnerResolver::new(text, &ctx.patterns);
        let at = text.find("Accessor").unwrap();
        assert_eq!(resolver.resolve("meta", at), Some(Owner::Meta("Player")));
        // Only bindings before the call count
        assert_eq!(resolver.resolve("meta", 0), Some(Owner::Table("meta")));
    }

    #[test]
    fn test_non_identifier_assignment_is_not_an_alias() {
        let text = "local t = {}\nlocal u = nil\nx(t)";
        let ctx = ctx();
        let resolver = OwnerResolver::new(text, &ctx.patterns);
        assert_eq!(resolver.resolve("t", text.len()), Some(Owner::Table("t")));
        assert_eq!(resolver.resolve("u", text.len()), Some(Owner::Table("u")));
        assert_eq!(resolver.resolve("t.x", text.len()), None);
    }
}
