use std::fmt;

// The string IDs straight from the feed. Unlike the cheap numeric IDs some feeds get remapped
// to, these are stable across separately loaded datasets, so colors and lookups can key on them.
macro_rules! orig_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub fn new<S: Into<String>>(id: S) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

orig_id!(StopID);
orig_id!(ShapeID);
orig_id!(TripID);
