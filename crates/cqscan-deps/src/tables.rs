// Approval reference data
// Both tables are built once at startup and only read afterwards

use std::collections::BTreeMap;
use tracing::warn;

const IPZILLA: &str = "https://dev.eclipse.org/ipzilla/show_bug.cgi?id=";

/// Artifact families that are cleared at *some* version (`group:artifact:packaging`)
const BUILTIN_UNVERSIONED: &[(&str, &str)] = &[
    ("org.apache.commons:commons-lang3:jar", "10282"),
    ("commons-io:commons-io:jar", "10286"),
    ("commons-codec:commons-codec:jar", "10287"),
    ("commons-logging:commons-logging:jar", "7873"),
    ("commons-fileupload:commons-fileupload:jar", "10289"),
    ("org.slf4j:slf4j-api:jar", "10304"),
    ("org.slf4j:jcl-over-slf4j:jar", "10305"),
    ("ch.qos.logback:logback-classic:jar", "10307"),
    ("ch.qos.logback:logback-core:jar", "10308"),
    ("org.json:json:jar", "10311"),
    ("javax.servlet:javax.servlet-api:jar", "7868"),
    ("com.google.guava:guava:jar", "10293"),
    ("org.quartz-scheduler:quartz:jar", "10316"),
    ("junit:junit:jar", "7697"),
    ("org.mockito:mockito-core:jar", "10318"),
    ("org.hamcrest:hamcrest-core:jar", "7698"),
];

/// Exact versions that are cleared (`group:artifact:packaging:version`)
const BUILTIN_VERSIONED: &[(&str, &str)] = &[
    ("org.apache.commons:commons-lang3:jar:3.1", "10282"),
    ("commons-io:commons-io:jar:2.4", "10286"),
    ("commons-codec:commons-codec:jar:1.9", "10287"),
    ("commons-logging:commons-logging:jar:1.1.1", "7873"),
    ("commons-fileupload:commons-fileupload:jar:1.3.1", "10289"),
    ("org.slf4j:slf4j-api:jar:1.7.12", "10304"),
    ("org.slf4j:jcl-over-slf4j:jar:1.7.12", "10305"),
    ("ch.qos.logback:logback-classic:jar:1.1.3", "10307"),
    ("ch.qos.logback:logback-core:jar:1.1.3", "10308"),
    ("org.json:json:jar:20140107", "10311"),
    ("javax.servlet:javax.servlet-api:jar:3.1.0", "7868"),
    ("com.google.guava:guava:jar:18.0", "10293"),
    ("org.quartz-scheduler:quartz:jar:2.2.1", "10316"),
    ("junit:junit:jar:4.12", "7697"),
    ("org.mockito:mockito-core:jar:1.10.19", "10318"),
    ("org.hamcrest:hamcrest-core:jar:1.3", "7698"),
    ("javax.activation:activation:jar:1.1.1", "7874"),
    ("javax.mail:mail:jar:1.4.7", "7875"),
];

/// A read-only `key -> reference` mapping
///
/// Duplicate keys keep the last value, same as a map literal would, but every
/// duplicate is logged and remembered so bad reference data gets noticed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApprovalTable {
    name: String,
    entries: BTreeMap<String, String>,
    duplicates: Vec<String>,
}

impl ApprovalTable {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
            duplicates: Vec::new(),
        }
    }

    pub fn from_entries<I, K, V>(name: impl Into<String>, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut table = Self::new(name);
        table.extend(entries);
        table
    }

    /// Add entries; an existing key is overwritten and flagged as a duplicate
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in entries {
            let key = key.into();
            let value = value.into();

            if let Some(previous) = self.entries.insert(key.clone(), value.clone()) {
                warn!(
                    "Duplicate key '{}' in {} table: '{}' replaced by '{}'",
                    key, self.name, previous, value
                );
                self.duplicates.push(key);
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys that were declared more than once, in the order they were seen
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }

    pub fn to_map(&self) -> BTreeMap<String, String> {
        self.entries.clone()
    }
}

/// The pair of tables every classification is checked against
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalTables {
    pub unversioned: ApprovalTable,
    pub versioned: ApprovalTable,
}

impl ApprovalTables {
    pub fn empty() -> Self {
        Self {
            unversioned: ApprovalTable::new("unversioned"),
            versioned: ApprovalTable::new("versioned"),
        }
    }

    /// The compiled-in reference data
    pub fn builtin() -> Self {
        let expand = |entries: &'static [(&'static str, &'static str)]| {
            entries
                .iter()
                .map(|(key, id)| (key.to_string(), format!("{}{}", IPZILLA, id)))
                .collect::<Vec<_>>()
        };

        Self {
            unversioned: ApprovalTable::from_entries("unversioned", expand(BUILTIN_UNVERSIONED)),
            versioned: ApprovalTable::from_entries("versioned", expand(BUILTIN_VERSIONED)),
        }
    }
}

impl Default for ApprovalTables {
    fn default() -> Self {
        Self::builtin()
    }
}
