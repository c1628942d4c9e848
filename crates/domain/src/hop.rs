use std::fmt;

/// The three upstream hops a resolver walks during iterative resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hop {
    Root,
    Tld,
    Auth,
}

impl Hop {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Tld => "tld",
            Self::Auth => "auth",
        }
    }
}

impl fmt::Display for Hop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
