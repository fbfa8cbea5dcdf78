use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The built-in brand code to display name table.
const BUILTIN: &[(&str, &str)] = &[
    ("hana", "Hana Atelier"),
    ("kaze", "Kaze Studio"),
    ("mori", "Mori Works"),
    ("sora", "Sora Apparel"),
    ("umi", "Umi Goods"),
    ("yuki", "Yuki Knit"),
];

/// Looks up brand display names by brand code.
///
/// The lookup is total: a code that is not in the table gets the placeholder name
/// `unknown (<code>)`.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BrandNames(BTreeMap<String, String>);

impl BrandNames {
    /// The built-in table.
    pub fn builtin() -> Self {
        Self(
            BUILTIN
                .iter()
                .map(|(code, name)| (code.to_string(), name.to_string()))
                .collect(),
        )
    }

    /// The built-in table with `overrides` added on top. Override codes are lowercased so that
    /// they match extracted brand codes.
    pub fn with_overrides<'a, I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut names = Self::builtin();
        for (code, name) in overrides {
            names.0.insert(code.to_ascii_lowercase(), name.clone());
        }
        names
    }

    pub fn get(&self, brand_code: &str) -> Option<&str> {
        self.0.get(brand_code).map(String::as_str)
    }

    /// The display name for `brand_code`, falling back to the placeholder name.
    pub fn name(&self, brand_code: &str) -> String {
        self.get(brand_code)
            .map(str::to_string)
            .unwrap_or_else(|| unknown_name(brand_code))
    }
}

/// The placeholder display name for a brand code that has no entry.
pub fn unknown_name(brand_code: &str) -> String {
    format!("unknown ({brand_code})")
}
