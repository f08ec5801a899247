//! Simulated address book.

use serde::{Deserialize, Serialize};

use crate::score::PointEvent;
use crate::script;
use crate::types::{LessonError, Result};

#[cfg(feature = "typescript")]
use ts_rs::TS;

/// A saved contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct Contact {
    /// Stable unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// E-mail address
    pub email: String,
    /// Avatar image reference
    pub avatar: String,
    /// Starred for quick access
    pub is_favorite: bool,
}

/// Ordered, append-only contact list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "typescript", derive(TS))]
#[cfg_attr(feature = "typescript", ts(export))]
pub struct ContactBook {
    contacts: Vec<Contact>,
    seeded: usize,
}

impl Default for ContactBook {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ContactBook {
    /// Book pre-filled with the two authored contacts.
    pub fn seeded() -> Self {
        let contacts: Vec<Contact> = script::SEED_CONTACTS
            .iter()
            .map(|seed| Contact {
                id: seed.id.to_string(),
                name: seed.name.to_string(),
                email: seed.email.to_string(),
                avatar: seed.avatar.to_string(),
                is_favorite: seed.is_favorite,
            })
            .collect();
        let seeded = contacts.len();
        Self { contacts, seeded }
    }

    pub fn len(&self) -> usize {
        self.contacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contacts.is_empty()
    }

    /// Contacts the student added on top of the seed.
    pub fn added_count(&self) -> usize {
        self.contacts.len() - self.seeded
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Contact> {
        self.contacts.iter().find(|c| c.id == id)
    }

    pub fn favorites(&self) -> impl Iterator<Item = &Contact> {
        self.contacts.iter().filter(|c| c.is_favorite)
    }

    /// Save a new contact.
    ///
    /// Name and e-mail are trimmed and must both be present.
    pub fn add(&mut self, name: &str, email: &str) -> Result<(&Contact, PointEvent)> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(LessonError::IncompleteContact);
        }

        // The id is URL-safe whatever the name holds
        let id = uuid::Uuid::new_v4().to_string();
        self.contacts.push(Contact {
            avatar: format!("https://picsum.photos/seed/{}/50/50", id),
            id,
            name: name.to_string(),
            email: email.to_string(),
            is_favorite: false,
        });

        let contact = &self.contacts[self.contacts.len() - 1];
        Ok((contact, PointEvent::ContactAdded))
    }

    /// Flip the favorite star. Returns the new value.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool> {
        let contact = self
            .contacts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| LessonError::UnknownContact(id.to_string()))?;
        contact.is_favorite = !contact.is_favorite;
        Ok(contact.is_favorite)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_book() {
        let book = ContactBook::seeded();
        assert_eq!(book.len(), 2);
        assert_eq!(book.added_count(), 0);
        assert_eq!(book.favorites().count(), 1);
        assert_eq!(book.get("2").map(|c| c.email.as_str()), Some("asaad4059@moe.om"));
    }

    #[test]
    fn test_add_contact_appends() {
        let mut book = ContactBook::seeded();
        let (contact, event) = book.add(" Sara ", "sara@school.com").unwrap();
        assert_eq!(contact.name, "Sara");
        assert_eq!(contact.avatar, format!("https://picsum.photos/seed/{}/50/50", contact.id));
        assert_eq!(event, PointEvent::ContactAdded);

        let last = book.iter().last().unwrap();
        assert_eq!(last.email, "sara@school.com");
        assert_eq!(book.added_count(), 1);
    }

    #[test]
    fn test_avatar_url_ignores_name_characters() {
        let mut book = ContactBook::seeded();
        let (contact, _) = book.add("سالم / أحمد", "salem@school.com").unwrap();
        let seed = contact
            .avatar
            .strip_prefix("https://picsum.photos/seed/")
            .and_then(|rest| rest.strip_suffix("/50/50"))
            .unwrap();
        assert_eq!(seed, contact.id);
        assert!(!contact.avatar.contains(' '));
    }

    #[test]
    fn test_contact_ids_unique() {
        let mut book = ContactBook::seeded();
        let first = book.add("A", "a@x.com").unwrap().0.id.clone();
        let second = book.add("B", "b@x.com").unwrap().0.id.clone();
        assert_ne!(first, second);
    }

    #[test]
    fn test_incomplete_contact_rejected() {
        let mut book = ContactBook::seeded();
        assert_eq!(book.add("", "x@y.com").unwrap_err(), LessonError::IncompleteContact);
        assert_eq!(book.add("Name", "  ").unwrap_err(), LessonError::IncompleteContact);
        assert_eq!(book.len(), 2);
    }

    #[test]
    fn test_toggle_favorite() {
        let mut book = ContactBook::seeded();
        assert_eq!(book.toggle_favorite("1"), Ok(true));
        assert_eq!(book.toggle_favorite("1"), Ok(false));
        assert!(matches!(
            book.toggle_favorite("missing"),
            Err(LessonError::UnknownContact(_))
        ));
    }
}
