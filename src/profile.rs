//! Profile data: the static, ordered set of cards in the stack.
//!
//! Ids are validated at load to be unique, ascending and consecutive, so
//! the card after `id` is always `id + 1`.

use serde::{Deserialize, Serialize};

use crate::error::{DeckError, Result};

/// A single profile card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Identifier; doubles as the card's position in the stack.
    pub id: u32,
    /// Embedded asset name or filesystem path of the profile picture.
    pub image: String,
    /// Optional display name shown on the card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Profile {
    /// Create a profile without a display name.
    pub fn new(id: u32, image: impl Into<String>) -> Self {
        Self {
            id,
            image: image.into(),
            name: None,
        }
    }

    /// Set the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display label: the name if any, otherwise `#id`.
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("#{}", self.id))
    }
}

/// The immutable, validated profile set.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileSet {
    profiles: Vec<Profile>,
}

impl ProfileSet {
    /// Validate and wrap an ordered sequence of profiles.
    ///
    /// # Errors
    ///
    /// Returns [`DeckError::Profiles`] if the set is empty or ids are not
    /// consecutive ascending integers, or if the last id is `u32::MAX` (the
    /// cursor moves one past the last card once the stack is exhausted).
    pub fn new(profiles: Vec<Profile>) -> Result<Self> {
        let Some(first) = profiles.first() else {
            return Err(DeckError::Profiles("at least one profile is required".into()));
        };

        let first_id = first.id;
        for (offset, profile) in profiles.iter().enumerate() {
            let expected = u32::try_from(offset)
                .ok()
                .and_then(|offset| first_id.checked_add(offset))
                .ok_or_else(|| DeckError::Profiles("profile ids overflow".into()))?;
            if profile.id != expected {
                return Err(DeckError::Profiles(format!(
                    "expected id {} but found {} (ids must be unique, ascending and consecutive)",
                    expected, profile.id
                )));
            }
        }

        if profiles.last().map(|p| p.id) == Some(u32::MAX) {
            return Err(DeckError::Profiles(format!(
                "profile id {} is reserved",
                u32::MAX
            )));
        }

        Ok(Self { profiles })
    }

    /// The four bundled profiles, ids 1 to 4.
    pub fn builtin() -> Self {
        Self {
            profiles: (1..=4)
                .map(|id| Profile::new(id, format!("{}.png", id)))
                .collect(),
        }
    }

    /// Id of the first card; the initial cursor.
    pub fn first_id(&self) -> u32 {
        self.profiles[0].id
    }

    /// Id of the last card.
    pub fn last_id(&self) -> u32 {
        self.profiles[self.profiles.len() - 1].id
    }

    /// O(1) lookup by id.
    pub fn get(&self, id: u32) -> Option<&Profile> {
        let index = id.checked_sub(self.first_id())? as usize;
        self.profiles.get(index)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }
}

impl Default for ProfileSet {
    fn default() -> Self {
        Self::builtin()
    }
}
