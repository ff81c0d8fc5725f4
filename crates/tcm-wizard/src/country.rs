//! Countries the marketplace accepts registrations from.

/// A supported country with its dialling and VAT prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Country {
    /// ISO 3166-1 alpha-2 code.
    pub code: &'static str,
    /// English display name.
    pub name: &'static str,
    /// International dialling prefix.
    pub phone_prefix: &'static str,
    /// Prefix of intra-EU VAT identification numbers.
    pub vat_prefix: &'static str,
}

/// Supported countries, in display order.
pub const COUNTRIES: [Country; 10] = [
    Country {
        code: "IT",
        name: "Italy",
        phone_prefix: "+39",
        vat_prefix: "IT",
    },
    Country {
        code: "FR",
        name: "France",
        phone_prefix: "+33",
        vat_prefix: "FR",
    },
    Country {
        code: "DE",
        name: "Germany",
        phone_prefix: "+49",
        vat_prefix: "DE",
    },
    Country {
        code: "ES",
        name: "Spain",
        phone_prefix: "+34",
        vat_prefix: "ES",
    },
    Country {
        code: "PT",
        name: "Portugal",
        phone_prefix: "+351",
        vat_prefix: "PT",
    },
    Country {
        code: "NL",
        name: "Netherlands",
        phone_prefix: "+31",
        vat_prefix: "NL",
    },
    Country {
        code: "BE",
        name: "Belgium",
        phone_prefix: "+32",
        vat_prefix: "BE",
    },
    Country {
        code: "AT",
        name: "Austria",
        phone_prefix: "+43",
        vat_prefix: "ATU",
    },
    Country {
        code: "IE",
        name: "Ireland",
        phone_prefix: "+353",
        vat_prefix: "IE",
    },
    Country {
        code: "LU",
        name: "Luxembourg",
        phone_prefix: "+352",
        vat_prefix: "LU",
    },
];

/// Look up a supported country by code (case-insensitive, surrounding
/// whitespace ignored).
pub fn find(code: &str) -> Option<&'static Country> {
    let code = code.trim();
    COUNTRIES
        .iter()
        .find(|country| country.code.eq_ignore_ascii_case(code))
}

/// Whether `code` names a supported country.
pub fn is_supported(code: &str) -> bool {
    find(code).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_is_case_insensitive() {
        let italy = find(" it ").unwrap();
        assert_eq!(italy.phone_prefix, "+39");
        assert_eq!(italy.vat_prefix, "IT");
    }

    #[test]
    fn test_unsupported_codes() {
        assert!(!is_supported(""));
        assert!(!is_supported("US"));
        assert!(is_supported("LU"));
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in COUNTRIES.iter().enumerate() {
            for b in &COUNTRIES[i + 1..] {
                assert_ne!(a.code, b.code);
            }
        }
    }
}
