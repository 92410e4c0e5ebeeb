use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate an enum that travels as a small integer code on the
/// predictor wire, with as_str + std::str::FromStr for form input.
macro_rules! coded_enum {
    ($name:ident { $($variant:ident => ($code:literal, $s:literal)),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(into = "u8", try_from = "u8")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            pub fn code(&self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }
        }

        impl From<$name> for u8 {
            fn from(value: $name) -> u8 {
                value.code()
            }
        }

        impl TryFrom<u8> for $name {
            type Error = ModelError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                match code {
                    $($code => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: code.to_string(),
                    }),
                }
            }
        }

        /// Accepts either the integer code used by the form ("0", "1")
        /// or the lowercase name.
        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if let Ok(code) = trimmed.parse::<u8>() {
                    return Self::try_from(code);
                }
                match trimmed {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

coded_enum!(Gender {
    Male => (0, "male"),
    Female => (1, "female"),
});

coded_enum!(GeneticRisk {
    Low => (0, "low"),
    Medium => (1, "medium"),
    High => (2, "high"),
});
