//! HTTP verbs understood by the CRUD dispatcher.

use std::fmt;
use std::str::FromStr;

use crate::error::UsageError;

/// The four verbs of the Backbone sync convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Create a new model.
    Post,
    /// Read a model or list a collection.
    Get,
    /// Update an existing model.
    Put,
    /// Delete a model.
    Delete,
}

impl Method {
    /// Canonical HTTP token for the verb.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Post => "POST",
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = UsageError;

    /// Accepts exactly the uppercase HTTP tokens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "POST" => Ok(Self::Post),
            "GET" => Ok(Self::Get),
            "PUT" => Ok(Self::Put),
            "DELETE" => Ok(Self::Delete),
            other => Err(UsageError::UnsupportedMethod {
                method: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Method;
    use crate::error::UsageError;

    #[test]
    fn should_parse_the_four_crud_verbs() {
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!("GET".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PUT".parse::<Method>().unwrap(), Method::Put);
        assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
    }

    #[test]
    fn should_reject_other_verbs() {
        let err = "PATCH".parse::<Method>().unwrap_err();
        assert_eq!(
            err,
            UsageError::UnsupportedMethod {
                method: "PATCH".to_string()
            }
        );
        assert!("OPTIONS".parse::<Method>().is_err());
        assert!("HEAD".parse::<Method>().is_err());
    }

    #[test]
    fn should_reject_lowercase_tokens() {
        assert!("get".parse::<Method>().is_err());
    }

    #[test]
    fn should_round_trip_through_display() {
        for method in [Method::Post, Method::Get, Method::Put, Method::Delete] {
            assert_eq!(method.to_string().parse::<Method>().unwrap(), method);
        }
    }
}
