//! Locale identifiers and the week data they imply.
//!
//! Only the calendrical side of a locale is modelled: the first weekday, the
//! minimum number of days in the first week, and the weekend days. The
//! values follow the CLDR week data for the supported territories.

use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use tracing::debug;

use crate::error::{EngineError, IdentifierKind, Result};
use crate::week::WeekRule;

const SAT_SUN: &[Weekday] = &[Weekday::Sat, Weekday::Sun];
const FRI_SAT: &[Weekday] = &[Weekday::Fri, Weekday::Sat];
const THU_FRI: &[Weekday] = &[Weekday::Thu, Weekday::Fri];
const SUN_ONLY: &[Weekday] = &[Weekday::Sun];
const FRI_ONLY: &[Weekday] = &[Weekday::Fri];

/// Week data of one territory.
#[derive(Debug)]
struct Territory {
    code: &'static str,
    first_weekday: Weekday,
    min_days: u8,
    weekend: &'static [Weekday],
}

const fn territory(
    code: &'static str,
    first_weekday: Weekday,
    min_days: u8,
    weekend: &'static [Weekday],
) -> Territory {
    Territory {
        code,
        first_weekday,
        min_days,
        weekend,
    }
}

use Weekday::{Mon, Sat, Sun};

const TERRITORIES: &[Territory] = &[
    territory("AE", Sat, 1, FRI_SAT),
    territory("AF", Sat, 1, THU_FRI),
    territory("AR", Mon, 1, SAT_SUN),
    territory("AT", Mon, 4, SAT_SUN),
    territory("AU", Mon, 1, SAT_SUN),
    territory("BE", Mon, 4, SAT_SUN),
    territory("BG", Mon, 4, SAT_SUN),
    territory("BH", Sat, 1, FRI_SAT),
    territory("BR", Sun, 1, SAT_SUN),
    territory("CA", Sun, 1, SAT_SUN),
    territory("CH", Mon, 4, SAT_SUN),
    territory("CL", Mon, 1, SAT_SUN),
    territory("CN", Mon, 1, SAT_SUN),
    territory("CO", Sun, 1, SAT_SUN),
    territory("CZ", Mon, 4, SAT_SUN),
    territory("DE", Mon, 4, SAT_SUN),
    territory("DK", Mon, 4, SAT_SUN),
    territory("DZ", Sat, 1, FRI_SAT),
    territory("EE", Mon, 4, SAT_SUN),
    territory("EG", Sat, 1, FRI_SAT),
    territory("ES", Mon, 4, SAT_SUN),
    territory("FI", Mon, 4, SAT_SUN),
    territory("FR", Mon, 4, SAT_SUN),
    territory("GB", Mon, 4, SAT_SUN),
    territory("GR", Mon, 4, SAT_SUN),
    territory("HK", Sun, 1, SAT_SUN),
    territory("HR", Mon, 1, SAT_SUN),
    territory("HU", Mon, 4, SAT_SUN),
    territory("ID", Sun, 1, SAT_SUN),
    territory("IE", Mon, 4, SAT_SUN),
    territory("IL", Sun, 1, FRI_SAT),
    territory("IN", Sun, 1, SUN_ONLY),
    territory("IQ", Sat, 1, FRI_SAT),
    territory("IR", Sat, 1, FRI_ONLY),
    territory("IS", Mon, 4, SAT_SUN),
    territory("IT", Mon, 4, SAT_SUN),
    territory("JO", Sat, 1, FRI_SAT),
    territory("JP", Sun, 1, SAT_SUN),
    territory("KR", Sun, 1, SAT_SUN),
    territory("KW", Sat, 1, FRI_SAT),
    territory("LT", Mon, 4, SAT_SUN),
    territory("LV", Mon, 1, SAT_SUN),
    territory("MX", Sun, 1, SAT_SUN),
    territory("MY", Mon, 1, SAT_SUN),
    territory("NL", Mon, 4, SAT_SUN),
    territory("NO", Mon, 4, SAT_SUN),
    territory("NZ", Mon, 1, SAT_SUN),
    territory("OM", Sat, 1, FRI_SAT),
    territory("PH", Sun, 1, SAT_SUN),
    territory("PK", Mon, 1, SAT_SUN),
    territory("PL", Mon, 4, SAT_SUN),
    territory("PT", Sun, 4, SAT_SUN),
    territory("QA", Sat, 1, FRI_SAT),
    territory("RO", Mon, 1, SAT_SUN),
    territory("RS", Mon, 1, SAT_SUN),
    territory("RU", Mon, 4, SAT_SUN),
    territory("SA", Sun, 1, FRI_SAT),
    territory("SE", Mon, 4, SAT_SUN),
    territory("SG", Sun, 1, SAT_SUN),
    territory("SK", Mon, 4, SAT_SUN),
    territory("TH", Sun, 1, SAT_SUN),
    territory("TR", Mon, 1, SAT_SUN),
    territory("TW", Sun, 1, SAT_SUN),
    territory("UA", Mon, 1, SAT_SUN),
    territory("US", Sun, 1, SAT_SUN),
    territory("VN", Mon, 1, SAT_SUN),
    territory("ZA", Sun, 1, SAT_SUN),
];

/// Supported ISO 639-1 language codes, paired with the territory assumed
/// when a locale names only the language.
const LANGUAGES: &[(&str, Option<&str>)] = &[
    ("ar", Some("EG")),
    ("bg", Some("BG")),
    ("cs", Some("CZ")),
    ("da", Some("DK")),
    ("de", Some("DE")),
    ("el", Some("GR")),
    ("en", Some("US")),
    ("es", Some("ES")),
    ("et", Some("EE")),
    ("fa", Some("IR")),
    ("fi", Some("FI")),
    ("fr", Some("FR")),
    ("he", Some("IL")),
    ("hi", Some("IN")),
    ("hr", Some("HR")),
    ("hu", Some("HU")),
    ("id", Some("ID")),
    ("is", Some("IS")),
    ("it", Some("IT")),
    ("ja", Some("JP")),
    ("ko", Some("KR")),
    ("lt", Some("LT")),
    ("lv", Some("LV")),
    ("ms", Some("MY")),
    ("nb", Some("NO")),
    ("nl", Some("NL")),
    ("pl", Some("PL")),
    ("pt", Some("BR")),
    ("ro", Some("RO")),
    ("ru", Some("RU")),
    ("sk", Some("SK")),
    ("sr", Some("RS")),
    ("sv", Some("SE")),
    ("th", Some("TH")),
    ("tr", Some("TR")),
    ("uk", Some("UA")),
    ("ur", Some("PK")),
    ("vi", Some("VN")),
    ("zh", Some("CN")),
    ("eo", None),
];

/// CLDR "001" (world) week data.
const WORLD: Territory = territory("001", Mon, 1, SAT_SUN);

/// A locale: language plus optional territory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Locale {
    language: &'static str,
    territory: Option<&'static str>,
}

impl Locale {
    /// `en_US`.
    pub const EN_US: Locale = Locale {
        language: "en",
        territory: Some("US"),
    };

    /// Parse `lang`, `lang_TERRITORY` or `lang-TERRITORY`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidIdentifier`] if the language or the
    /// territory is not supported.
    pub fn parse(identifier: &str) -> Result<Self> {
        let invalid = || EngineError::identifier(IdentifierKind::Locale, identifier);
        let trimmed = identifier.trim();
        let mut parts = trimmed.split(['_', '-']);
        let lang = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;
        let territory = parts.next();
        if parts.next().is_some() {
            return Err(invalid());
        }

        let lang = lang.to_ascii_lowercase();
        let language = LANGUAGES
            .iter()
            .find(|(code, _)| *code == lang)
            .map(|(code, _)| *code)
            .ok_or_else(invalid)?;

        let territory = match territory {
            None => None,
            Some(t) => {
                let upper = t.to_ascii_uppercase();
                let found = TERRITORIES
                    .iter()
                    .find(|entry| entry.code == upper)
                    .ok_or_else(invalid)?;
                Some(found.code)
            }
        };

        Ok(Locale {
            language,
            territory,
        })
    }

    /// The locale configured in the process environment.
    ///
    /// Reads `LC_ALL`, `LC_TIME` then `LANG`, drops any `.encoding` or
    /// `@modifier` suffix, and treats `C`/`POSIX` as `en_US`. Falls back to
    /// `en_US` when nothing usable is set.
    pub fn system() -> Self {
        let raw = ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.trim().is_empty());

        let Some(raw) = raw else {
            return Locale::EN_US;
        };
        Self::from_posix(&raw).unwrap_or_else(|err| {
            debug!(locale = %raw, error = %err, "unsupported system locale, using en_US");
            Locale::EN_US
        })
    }

    fn from_posix(raw: &str) -> Result<Self> {
        let base = raw.split(['.', '@']).next().unwrap_or_default();
        match base {
            "C" | "POSIX" => Ok(Locale::EN_US),
            other => Locale::parse(other),
        }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn territory(&self) -> Option<&'static str> {
        self.territory
    }

    /// Canonical identifier, e.g. `en_US`.
    pub fn identifier(&self) -> String {
        match self.territory {
            Some(t) => format!("{}_{}", self.language, t),
            None => self.language.to_string(),
        }
    }

    fn week_data(&self) -> &'static Territory {
        let code = self.territory.or_else(|| {
            LANGUAGES
                .iter()
                .find(|(code, _)| *code == self.language)
                .and_then(|(_, likely)| *likely)
        });
        code.and_then(|c| TERRITORIES.iter().find(|entry| entry.code == c))
            .unwrap_or(&WORLD)
    }

    /// First weekday and minimum days in the first week.
    pub fn week_rule(&self) -> WeekRule {
        let data = self.week_data();
        WeekRule::from_parts(data.first_weekday, data.min_days)
    }

    /// The weekend days.
    pub fn weekend(&self) -> &'static [Weekday] {
        self.week_data().weekend
    }
}

impl Default for Locale {
    fn default() -> Self {
        Locale::EN_US
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

impl FromStr for Locale {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        Locale::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_separators_and_case() {
        let a = Locale::parse("en_US").unwrap();
        let b = Locale::parse("EN-us").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.identifier(), "en_US");
        assert_eq!(Locale::parse("de").unwrap().identifier(), "de");
    }

    #[test]
    fn test_unknown_locale_is_an_error() {
        for bad in ["", "xx_US", "en_ZZ", "en_US_POSIX", "_US"] {
            let err = Locale::parse(bad).unwrap_err();
            assert!(
                matches!(
                    err,
                    EngineError::InvalidIdentifier {
                        kind: IdentifierKind::Locale,
                        ..
                    }
                ),
                "{bad}: {err}"
            );
        }
    }

    #[test]
    fn test_week_rules() {
        let us = Locale::parse("en_US").unwrap().week_rule();
        assert_eq!(us.first_weekday(), Weekday::Sun);
        assert_eq!(us.min_days_in_first_week(), 1);

        let de = Locale::parse("de_DE").unwrap().week_rule();
        assert_eq!(de, WeekRule::ISO);

        let eg = Locale::parse("ar_EG").unwrap().week_rule();
        assert_eq!(eg.first_weekday(), Weekday::Sat);
    }

    #[test]
    fn test_language_only_uses_likely_territory() {
        assert_eq!(Locale::parse("en").unwrap().week_rule().first_weekday(), Weekday::Sun);
        assert_eq!(Locale::parse("fr").unwrap().week_rule(), WeekRule::ISO);
        // no likely territory: world defaults
        let eo = Locale::parse("eo").unwrap();
        assert_eq!(eo.week_rule().first_weekday(), Weekday::Mon);
        assert_eq!(eo.weekend(), &[Weekday::Sat, Weekday::Sun]);
    }

    #[test]
    fn test_weekends() {
        assert_eq!(Locale::parse("en_US").unwrap().weekend(), &[Weekday::Sat, Weekday::Sun]);
        assert_eq!(Locale::parse("ar_AE").unwrap().weekend(), &[Weekday::Fri, Weekday::Sat]);
        assert_eq!(Locale::parse("hi_IN").unwrap().weekend(), &[Weekday::Sun]);
    }

    #[test]
    fn test_posix_locale_strings() {
        assert_eq!(Locale::from_posix("de_DE.UTF-8").unwrap().identifier(), "de_DE");
        assert_eq!(Locale::from_posix("C").unwrap(), Locale::EN_US);
        assert_eq!(Locale::from_posix("sr_RS@latin").unwrap().identifier(), "sr_RS");
        assert!(Locale::from_posix("klingon").is_err());
    }
}
