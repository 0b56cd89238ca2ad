use std::collections::HashMap;

use crate::errors::AliasError;

/// One-level redirect map with chase-to-fixed-point lookup.
#[derive(Default)]
pub struct AliasTable {
    aliases: HashMap<String, String>,
}

impl AliasTable {
    /// Registers `alias` as another name for `target`.
    pub fn register(&mut self, target: &str, alias: &str) -> Result<(), AliasError> {
        if alias == target {
            return Err(AliasError::SelfAlias(target.to_owned()));
        }

        self.aliases.insert(alias.to_owned(), target.to_owned());
        Ok(())
    }

    /// Chases the alias chain until a name with no entry is reached.
    ///
    /// A cyclic chain recurses until the stack limit aborts.
    pub fn resolve(&self, name: &str) -> String {
        match self.aliases.get(name) {
            Some(target) => self.resolve(target),
            None => name.to_owned(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.aliases.contains_key(name)
    }

    /// Removes the alias entry registered under exactly `name`.
    pub fn remove(&mut self, name: &str) {
        self.aliases.remove(name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_name_resolves_to_itself() {
        let table = AliasTable::default();
        assert_eq!(table.resolve("mailer"), "mailer");
    }

    #[test]
    fn chain_resolves_to_fixed_point() {
        let mut table = AliasTable::default();
        table.register("mailer", "mail").unwrap();
        table.register("mail", "m").unwrap();

        assert_eq!(table.resolve("m"), "mailer");
        assert_eq!(table.resolve("mail"), "mailer");
        assert_eq!(table.resolve("mailer"), "mailer");
    }

    #[test]
    fn self_alias_is_rejected() {
        let mut table = AliasTable::default();
        let err = table.register("mailer", "mailer").unwrap_err();
        assert!(matches!(err, AliasError::SelfAlias(name) if name == "mailer"));
    }

    #[test]
    fn remove_only_drops_the_exact_key() {
        let mut table = AliasTable::default();
        table.register("mailer", "mail").unwrap();
        table.register("mail", "m").unwrap();

        table.remove("mail");

        assert!(!table.contains("mail"));
        assert_eq!(table.resolve("m"), "mail");
    }
}
