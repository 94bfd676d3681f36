use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Raw integer value.
            #[must_use]
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }
    };
}

numeric_id!(
    /// Identifier of a task. Positive, assigned as `max + 1`.
    TaskId
);

numeric_id!(
    /// Identifier of a task comment. Positive, assigned as `max + 1` across all tasks.
    CommentId
);

macro_rules! sequential_id {
    ($name:ident) => {
        impl $name {
            /// Largest id a store accepts; [`next_after`](Self::next_after) never hands it out.
            pub const MAX: Self = Self(u64::MAX);

            /// Identifier following the largest one in `ids`, or `1` for an empty collection.
            /// `None` once the id space is exhausted.
            #[must_use]
            pub fn next_after<I>(ids: I) -> Option<Self>
            where
                I: IntoIterator<Item = Self>,
            {
                match ids.into_iter().max() {
                    None => Some(Self(1)),
                    Some(Self(max)) => max
                        .checked_add(1)
                        .filter(|next| *next < u64::MAX)
                        .map(Self),
                }
            }

            /// Whether a stored record may carry this id.
            #[must_use]
            pub const fn is_assignable(self) -> bool {
                self.0 != 0 && self.0 != u64::MAX
            }
        }
    };
}

sequential_id!(TaskId);
sequential_id!(CommentId);

numeric_id!(
    /// Identifier of a user.
    UserId
);

numeric_id!(
    /// Identifier of a category.
    CategoryId
);
