//! Currency definitions.

use std::str::FromStr;

use derive_more::{AsRef, Display};

/// [ISO 4217] code of a currency.
///
/// [ISO 4217]: https://wikipedia.org/wiki/ISO_4217
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(forward)]
pub struct Code(String);

impl Code {
    /// Creates a new [`Code`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `code` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Creates a new [`Code`] if the given `code` is valid, uppercasing it.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Option<Self> {
        let mut code = code.into();
        Self::check(&code).then(|| {
            code.make_ascii_uppercase();
            Self(code)
        })
    }

    /// Checks whether the given `code` is a valid [`Code`].
    fn check(code: impl AsRef<str>) -> bool {
        let code = code.as_ref();
        code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
    }
}

impl FromStr for Code {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Code`")
    }
}

#[cfg(feature = "serde")]
mod serde {
    //! Module providing integration with [`serde`] crate.

    use serde::{Serialize, Serializer};

    use super::Code;

    impl Serialize for Code {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_ref())
        }
    }
}

#[cfg(test)]
mod spec {
    use std::str::FromStr as _;

    use super::Code;

    #[test]
    fn accepts_three_letter_codes() {
        assert_eq!(Code::new("MAD").unwrap().to_string(), "MAD");
        assert_eq!(Code::new("eur").unwrap().to_string(), "EUR");
        assert_eq!(Code::from_str("Usd").unwrap().to_string(), "USD");
    }

    #[test]
    fn rejects_malformed_codes() {
        assert_eq!(Code::new(""), None);
        assert_eq!(Code::new("EU"), None);
        assert_eq!(Code::new("EURO"), None);
        assert_eq!(Code::new("E1R"), None);
        assert_eq!(Code::new("EU "), None);
    }
}
