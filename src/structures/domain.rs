/*!
The domain of a marker or individual, and the group of an individual.

A domain begins free and may be fixed to zero or one exactly once.

```rust
# use csfs::structures::domain::Domain;
let mut domain = Domain::default();
assert!(!domain.is_set());
assert!(domain.fix(false));
assert!(!domain.fix(false));
assert!(domain.is_zero());
```
*/

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Domain {
    /// Undecided.
    #[default]
    Free,

    /// Fixed to zero.
    Zero,

    /// Fixed to one.
    One,
}

impl Domain {
    pub fn is_zero(self) -> bool {
        self == Domain::Zero
    }

    pub fn is_one(self) -> bool {
        self == Domain::One
    }

    pub fn is_set(self) -> bool {
        self != Domain::Free
    }

    /// The fixed value of the domain, if any.
    pub fn value(self) -> Option<bool> {
        match self {
            Domain::Free => None,
            Domain::Zero => Some(false),
            Domain::One => Some(true),
        }
    }

    /// Fixes the domain to `value`, returning true if the domain was free.
    ///
    /// # Panics
    /// If the domain is fixed to the opposite value, as domains are never revised.
    pub fn fix(&mut self, value: bool) -> bool {
        match (*self, value) {
            (Domain::Free, false) => {
                *self = Domain::Zero;
                true
            }
            (Domain::Free, true) => {
                *self = Domain::One;
                true
            }
            (Domain::Zero, false) | (Domain::One, true) => false,
            (fixed, _) => panic!("Attempt to fix a domain of {fixed:?} to {value}"),
        }
    }
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Domain::Free => write!(f, "2"),
            Domain::Zero => write!(f, "0"),
            Domain::One => write!(f, "1"),
        }
    }
}

/// The two groups an individual may belong to.
///
/// Group one is the group whose carriers of a pattern raise the objective, and group two the group whose carriers lower it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    One,
    Two,
}
