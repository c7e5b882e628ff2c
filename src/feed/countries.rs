use std::collections::HashMap;

/// Country names as written in awesome-rss-feeds section headers, with codes.
const BUILTIN_COUNTRY_CODES: &[(&str, &str)] = &[
    ("Australia", "AU"),
    ("Bangladesh", "BD"),
    ("Brazil", "BR"),
    ("Canada", "CA"),
    ("China", "CN"),
    ("France", "FR"),
    ("Germany", "DE"),
    ("Hong Kong", "HK"),
    ("Hong Kong SAR China", "HK"),
    ("India", "IN"),
    ("Indonesia", "ID"),
    ("Iran", "IR"),
    ("Ireland", "IE"),
    ("Italy", "IT"),
    ("Japan", "JP"),
    ("Mexico", "MX"),
    ("Myanmar (Burma)", "MM"),
    ("Nigeria", "NG"),
    ("Pakistan", "PK"),
    ("Philippines", "PH"),
    ("Poland", "PL"),
    ("Russia", "RU"),
    ("South Africa", "ZA"),
    ("Spain", "ES"),
    ("Ukraine", "UA"),
    ("United Kingdom", "GB"),
    ("United States", "US"),
];

/// Display names for codes whose header spelling is not the name we want to
/// store, or which never appear in a header (e.g. the legacy `UK`).
const PREFERRED_NAMES: &[(&str, &str)] = &[
    ("GB", "United Kingdom"),
    ("HK", "Hong Kong"),
    ("MM", "Myanmar"),
    ("UK", "United Kingdom"),
];

/// Immutable country-name ⇄ code lookup used by the extractor and importer.
///
/// [`CountryCodes::default`] holds the built-in table. Callers that need a
/// different mapping (tests, or the `[country_codes]` config table) build one
/// with [`CountryCodes::with_overrides`] or [`CountryCodes::from_pairs`].
#[derive(Debug, Clone)]
pub struct CountryCodes {
    by_name: HashMap<String, String>,
    by_code: HashMap<String, String>,
}

impl Default for CountryCodes {
    fn default() -> Self {
        Self::from_pairs(BUILTIN_COUNTRY_CODES.iter().copied())
    }
}

impl CountryCodes {
    /// Builds a table from `(name, code)` pairs. Codes are uppercased.
    ///
    /// When several names share a code, the first one wins the reverse
    /// (code → name) lookup unless [`PREFERRED_NAMES`] says otherwise.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut table = Self {
            by_name: HashMap::new(),
            by_code: HashMap::new(),
        };
        for (name, code) in pairs {
            table.insert(name, code);
        }
        for (code, name) in PREFERRED_NAMES {
            table.by_code.insert((*code).to_string(), (*name).to_string());
        }
        table
    }

    /// Returns the built-in table with `overrides` merged on top.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut table = Self::default();
        for (name, code) in overrides {
            let code = code.trim().to_uppercase();
            table.by_name.insert(name.trim().to_string(), code.clone());
            table.by_code.insert(code, name.trim().to_string());
        }
        table
    }

    fn insert(&mut self, name: &str, code: &str) {
        let code = code.trim().to_uppercase();
        self.by_name.insert(name.trim().to_string(), code.clone());
        self.by_code
            .entry(code)
            .or_insert_with(|| name.trim().to_string());
    }

    /// Resolves a country name to its code.
    ///
    /// Unknown names fall back to their first two characters, uppercased.
    ///
    /// # Examples
    ///
    /// ```
    /// use feedatlas::feed::CountryCodes;
    ///
    /// let codes = CountryCodes::default();
    /// assert_eq!(codes.code_for("United Kingdom"), "GB");
    /// assert_eq!(codes.code_for("Atlantis"), "AT");
    /// ```
    pub fn code_for(&self, name: &str) -> String {
        let name = name.trim();
        if let Some(code) = self.by_name.get(name) {
            return code.clone();
        }
        name.chars().take(2).collect::<String>().to_uppercase()
    }

    /// Resolves a code to a display name, falling back to the code itself.
    pub fn name_for(&self, code: &str) -> String {
        let code = code.trim().to_uppercase();
        self.by_code.get(&code).cloned().unwrap_or(code)
    }

    /// Number of names in the table.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
