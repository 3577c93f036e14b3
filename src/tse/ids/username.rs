use std::fmt;

/// Unique account key, immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Username(String);

impl Username {
    pub fn new(name: &str) -> Self {
        return Self(name.trim().to_string());
    }

    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    pub fn as_str(&self) -> &str {
        return &self.0;
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.0);
    }
}
