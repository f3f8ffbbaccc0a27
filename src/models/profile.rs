//! User profile and login payload

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of government identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum IdType {
    /// National identity card
    #[default]
    Nacional,
    /// Foreign resident document
    Dimex,
    Pasaporte,
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nacional => write!(f, "nacional"),
            Self::Dimex => write!(f, "dimex"),
            Self::Pasaporte => write!(f, "pasaporte"),
        }
    }
}

impl FromStr for IdType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nacional" | "cedula" | "cédula" => Ok(Self::Nacional),
            "dimex" => Ok(Self::Dimex),
            "pasaporte" | "passport" => Ok(Self::Pasaporte),
            other => Err(format!("Tipo de identificación desconocido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Government id string
    pub id: String,
    /// Display phone
    pub phone: String,
    pub avatar_color: String,
    pub id_type: IdType,
}

/// Credentials accepted by `login`
#[derive(Debug, Clone, Default)]
pub struct LoginPayload {
    pub id: String,
    pub phone: String,
    pub name: Option<String>,
    pub id_type: Option<IdType>,
}

impl LoginPayload {
    pub fn new(id: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            phone: phone.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_type_parse() {
        assert_eq!("Cédula".parse::<IdType>(), Ok(IdType::Nacional));
        assert_eq!("DIMEX".parse::<IdType>(), Ok(IdType::Dimex));
        assert!("licencia".parse::<IdType>().is_err());
    }

    #[test]
    fn test_id_type_display_round_trip() {
        for t in [IdType::Nacional, IdType::Dimex, IdType::Pasaporte] {
            assert_eq!(t.to_string().parse::<IdType>(), Ok(t));
        }
    }
}
