//! Font name normalization and lookup.
//!
//! Font names in pack manifests are written by hand, so spelling varies
//! (`Topaz_A500`, `topaz-a500`, `topaz a500`). Names are normalized by
//! lowercasing and turning every `_` and `-` into a space, then looked up in
//! a fixed registry that maps accepted spellings to a canonical name.
//!
//! Two registries exist: [`FontRegistry::Current`], covering the SAUCE
//! console families, Amiga system fonts and the `ibm vga <codepage>` family,
//! and [`FontRegistry::Legacy`], the older console-font-only list kept for
//! checking records written against it.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

/// Code pages with a registered `ibm vga <codepage>` name.
pub const IBM_VGA_CODE_PAGES: &[&str] = &[
    "437", "720", "737", "775", "819", "850", "852", "855", "857", "858", "860", "861", "862",
    "863", "864", "865", "866", "869", "872", "KAM", "MAZ", "MIK",
];

/// `(spelling, canonical)` pairs shared by both registries.
const LEGACY_FONTS: &[(&str, &str)] = &[
    // Official fonts
    ("cp437 8x8", "cp437 8x8"),
    ("cp437 8x16", "cp437 8x16"),
    ("cp866 8x16", "cp866 8x16"),
    ("microknight", "microknight"),
    ("microknightplus", "microknightplus"),
    ("mo'soul", "mo'soul"),
    ("p0t noodle", "p0t noodle"),
    ("topaz a500", "topaz a500"),
    ("topazplus a500", "topazplus a500"),
    ("topaz a1200", "topaz a1200"),
    ("topazplus a1200", "topazplus a1200"),
    // Aliases
    ("cp437", "cp437 8x16"),
    ("microknight+", "microknightplus"),
    ("mosoul", "mo'soul"),
    ("mo soul", "mo'soul"),
    ("p0tnoodle", "p0t noodle"),
    ("topaz", "topaz a1200"),
    ("topaz+", "topazplus a1200"),
    ("topaz2", "topaz a1200"),
    ("topaz2+", "topazplus a1200"),
    ("topaz+ a500", "topazplus a500"),
    ("topaz+ a1200", "topazplus a1200"),
];

const SAUCE_FONTS: &[(&str, &str)] = &[
    ("ibm vga", "ibm vga"),
    ("ibm vga50", "ibm vga50"),
    ("ibm vga25g", "ibm vga25g"),
    ("ibm ega", "ibm ega"),
    ("ibm ega43", "ibm ega43"),
    ("amiga topaz 1", "amiga topaz 1"),
    ("amiga topaz 1+", "amiga topaz 1+"),
    ("amiga topaz 2", "amiga topaz 2"),
    ("amiga topaz 2+", "amiga topaz 2+"),
    ("amiga p0t noodle", "amiga p0t noodle"),
    ("amiga microknight", "amiga microknight"),
    ("amiga microknight+", "amiga microknight+"),
    ("amiga mosoul", "amiga mosoul"),
    ("c64 petscii unshifted", "c64 petscii unshifted"),
    ("c64 petscii shifted", "c64 petscii shifted"),
    ("atari atascii", "atari atascii"),
    // Console aliases
    ("ibm vga 8x16", "ibm vga"),
    ("ibm vga 8x8", "ibm vga50"),
    ("ibm ega 8x14", "ibm ega"),
    // Amiga aliases
    ("amiga topaz a500", "amiga topaz 1"),
    ("amiga topaz a1200", "amiga topaz 2"),
    ("amiga topazplus a500", "amiga topaz 1+"),
    ("amiga topazplus a1200", "amiga topaz 2+"),
    ("amiga microknightplus", "amiga microknight+"),
    ("amiga mo'soul", "amiga mosoul"),
];

static LEGACY_REGISTRY: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    LEGACY_FONTS
        .iter()
        .map(|&(spelling, canonical)| (spelling.to_string(), canonical))
        .collect()
});

static CURRENT_REGISTRY: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut fonts: HashMap<String, &'static str> = LEGACY_FONTS
        .iter()
        .chain(SAUCE_FONTS)
        .map(|&(spelling, canonical)| (spelling.to_string(), canonical))
        .collect();
    // Code page variants resolve to the base family.
    for code_page in IBM_VGA_CODE_PAGES {
        fonts.insert(format!("ibm vga {}", code_page.to_lowercase()), "ibm vga");
    }
    fonts
});

/// Selects which font registry a validator consults.
///
/// # Examples
///
/// ```
/// use textmeta_core::FontRegistry;
///
/// assert!(FontRegistry::Current.is_known("IBM_VGA-866"));
/// assert!(!FontRegistry::Legacy.is_known("IBM VGA 866"));
/// assert!(FontRegistry::Legacy.is_known("MicroKnight+"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontRegistry {
    /// Console, Amiga and code-page fonts plus all legacy spellings.
    #[default]
    Current,
    /// The original console-font list.
    Legacy,
}

impl FontRegistry {
    fn table(self) -> &'static HashMap<String, &'static str> {
        match self {
            Self::Current => &*CURRENT_REGISTRY,
            Self::Legacy => &*LEGACY_REGISTRY,
        }
    }

    /// Resolves a raw font name to its canonical registry name.
    ///
    /// # Examples
    ///
    /// ```
    /// use textmeta_core::FontRegistry;
    ///
    /// assert_eq!(FontRegistry::Current.canonical("Mo_Soul"), Some("mo'soul"));
    /// assert_eq!(FontRegistry::Current.canonical("comic sans"), None);
    /// ```
    pub fn canonical(self, raw: &str) -> Option<&'static str> {
        self.table().get(&normalize_font_name(raw)).copied()
    }

    /// Returns `true` if `raw` names a registered font after normalization.
    pub fn is_known(self, raw: &str) -> bool {
        self.canonical(raw).is_some()
    }
}

/// Lowercases `raw` and replaces every `_` and `-` with a space.
///
/// # Examples
///
/// ```
/// use textmeta_core::normalize_font_name;
///
/// assert_eq!(normalize_font_name("Micro_Knight"), "micro knight");
/// assert_eq!(normalize_font_name("Topaz-A500"), "topaz a500");
/// ```
pub fn normalize_font_name(raw: &str) -> String {
    raw.to_lowercase().replace(['_', '-'], " ")
}

/// Checks `raw` against the current registry.
pub fn is_known_font(raw: &str) -> bool {
    FontRegistry::Current.is_known(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_is_idempotent() {
        for raw in ["Topaz_A500", "p0t-NOoDLE", "mo'soul", "IBM VGA KAM", "a__b--c"] {
            let once = normalize_font_name(raw);
            assert_eq!(normalize_font_name(&once), once);
        }
    }

    #[test]
    fn test_normalize_replaces_each_separator() {
        assert_eq!(normalize_font_name("a__b"), "a  b");
        assert_eq!(normalize_font_name("P0T-NOoDLE"), "p0t noodle");
    }

    #[test]
    fn test_separator_spellings_are_equivalent() {
        assert!(is_known_font("Topaz_A500"));
        assert!(is_known_font("topaz-a500"));
        assert!(is_known_font("topaz a500"));
    }

    #[test]
    fn test_code_page_family() {
        for code_page in IBM_VGA_CODE_PAGES {
            let name = format!("IBM VGA {code_page}");
            assert_eq!(FontRegistry::Current.canonical(&name), Some("ibm vga"));
        }
        assert!(!is_known_font("ibm vga 999"));
    }

    #[test]
    fn test_current_is_superset_of_legacy() {
        for (spelling, _) in LEGACY_FONTS {
            assert!(FontRegistry::Current.is_known(spelling), "{spelling}");
        }
        assert!(CURRENT_REGISTRY.len() > LEGACY_REGISTRY.len());
    }

    #[test]
    fn test_amiga_sauce_names() {
        assert!(is_known_font("Amiga Topaz 1+"));
        assert!(is_known_font("Amiga P0T-NOoDLE"));
        assert!(!FontRegistry::Legacy.is_known("Amiga Topaz 1"));
    }

    #[test]
    fn test_registry_keys_are_normalized() {
        for (spelling, canonical) in LEGACY_FONTS.iter().chain(SAUCE_FONTS) {
            assert_eq!(normalize_font_name(spelling), *spelling);
            assert_eq!(normalize_font_name(canonical), *canonical);
        }
    }

    #[test]
    fn test_unknown_fonts() {
        assert!(!is_known_font("comic sans"));
        assert!(!is_known_font(""));
        assert!(!is_known_font("microknight++"));
    }

    #[test]
    fn test_registry_deserializes_lowercase() {
        let registry: FontRegistry = serde_yaml::from_str("legacy").unwrap();
        assert_eq!(registry, FontRegistry::Legacy);
    }
}
