//! In-memory fakes backing the core unit tests: a [`BookStore`] that keeps
//! everything in vectors, a scripted metadata provider, and deterministic
//! shufflers.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{
    Book, Interest, ReadingEntry, RecommendedBook, User, UserAccount, UserCredentials,
};
use crate::ports::{
    BookMetadataProvider, BookStore, CategoryShuffler, LinkOutcome, PortError, PortResult,
};

/// A throwaway book with recognizable fields.
pub fn book(id: &str) -> Book {
    Book {
        id: id.to_string(),
        title: format!("Livro {id}"),
        author: "Autor de Teste".to_string(),
        cover_url: String::new(),
        description: String::new(),
        link: String::new(),
    }
}

struct StoredUser {
    user: User,
    password_hash: String,
}

#[derive(Default)]
pub struct InMemoryStore {
    users: Mutex<Vec<StoredUser>>,
    interests: Mutex<Vec<Interest>>,
    user_interests: Mutex<Vec<(Uuid, Uuid)>>,
    books: Mutex<Vec<Book>>,
    // (insertion seq, entry); the seq stands in for a strictly increasing
    // created_at so ordering assertions stay deterministic.
    entries: Mutex<Vec<(u64, ReadingEntry)>>,
    next_seq: Mutex<u64>,
    entry_updates: Mutex<u64>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed_user(&self, name: &str, email: &str) -> Uuid {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        let id = user.id;
        self.users.lock().unwrap().push(StoredUser {
            user,
            password_hash: "fake-hash".to_string(),
        });
        id
    }

    pub fn link_interest(&self, user_id: Uuid, name: &str) {
        let interest_id = {
            let mut interests = self.interests.lock().unwrap();
            match interests.iter().find(|i| i.name == name) {
                Some(existing) => existing.id,
                None => {
                    let interest = Interest {
                        id: Uuid::new_v4(),
                        name: name.to_string(),
                    };
                    let id = interest.id;
                    interests.push(interest);
                    id
                }
            }
        };
        let mut links = self.user_interests.lock().unwrap();
        if !links.contains(&(user_id, interest_id)) {
            links.push((user_id, interest_id));
        }
    }

    pub fn give_interests(&self, user_id: Uuid, names: &[&str]) {
        for name in names {
            self.link_interest(user_id, name);
        }
    }

    pub fn seed_book(&self, book: Book) {
        self.books.lock().unwrap().push(book);
    }

    pub fn set_streak(
        &self,
        user_id: Uuid,
        book_id: &str,
        streak: i32,
        last_read_at: Option<DateTime<Utc>>,
    ) {
        let mut entries = self.entries.lock().unwrap();
        let (_, entry) = entries
            .iter_mut()
            .find(|(_, e)| e.user_id == user_id && e.book_id == book_id)
            .expect("entry must be seeded first");
        entry.streak = streak;
        entry.last_read_at = last_read_at;
    }

    pub fn entry(&self, user_id: Uuid, book_id: &str) -> Option<ReadingEntry> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .find(|(_, e)| e.user_id == user_id && e.book_id == book_id)
            .map(|(_, e)| e.clone())
    }

    pub fn entry_count(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn book_count(&self) -> usize {
        self.books.lock().unwrap().len()
    }

    pub fn entry_update_count(&self) -> u64 {
        *self.entry_updates.lock().unwrap()
    }
}

#[async_trait]
impl BookStore for InMemoryStore {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> PortResult<User> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.user.email == email) {
            return Err(PortError::Conflict(format!(
                "email {email} is already registered"
            )));
        }
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            user: user.clone(),
            password_hash: password_hash.to_string(),
        });
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> PortResult<Option<UserCredentials>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.email == email)
            .map(|u| UserCredentials {
                id: u.user.id,
                name: u.user.name.clone(),
                email: u.user.email.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn get_user(&self, user_id: Uuid) -> PortResult<User> {
        self.users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.user.id == user_id)
            .map(|u| u.user.clone())
            .ok_or_else(|| PortError::NotFound(format!("User {user_id} not found")))
    }

    async fn list_users(&self) -> PortResult<Vec<UserAccount>> {
        let users = self.users.lock().unwrap();
        let interests = self.interests.lock().unwrap();
        let links = self.user_interests.lock().unwrap();
        let by_id: HashMap<Uuid, &str> =
            interests.iter().map(|i| (i.id, i.name.as_str())).collect();

        Ok(users
            .iter()
            .map(|u| UserAccount {
                user: u.user.clone(),
                interests: links
                    .iter()
                    .filter(|(user_id, _)| *user_id == u.user.id)
                    .filter_map(|(_, interest_id)| by_id.get(interest_id))
                    .map(|name| name.to_string())
                    .collect(),
            })
            .collect())
    }

    async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.user.id != user_id);
        if users.len() == before {
            return Err(PortError::NotFound(format!("User {user_id} not found")));
        }
        self.user_interests
            .lock()
            .unwrap()
            .retain(|(id, _)| *id != user_id);
        self.entries
            .lock()
            .unwrap()
            .retain(|(_, e)| e.user_id != user_id);
        Ok(())
    }

    async fn find_interests_by_names(&self, names: &[String]) -> PortResult<Vec<Interest>> {
        Ok(self
            .interests
            .lock()
            .unwrap()
            .iter()
            .filter(|i| names.contains(&i.name))
            .cloned()
            .collect())
    }

    async fn add_user_interests(&self, user_id: Uuid, interest_ids: &[Uuid]) -> PortResult<()> {
        let mut links = self.user_interests.lock().unwrap();
        for interest_id in interest_ids {
            if !links.contains(&(user_id, *interest_id)) {
                links.push((user_id, *interest_id));
            }
        }
        Ok(())
    }

    async fn interests_for_user(&self, user_id: Uuid) -> PortResult<Vec<Interest>> {
        let interests = self.interests.lock().unwrap();
        Ok(self
            .user_interests
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == user_id)
            .filter_map(|(_, interest_id)| {
                interests.iter().find(|i| i.id == *interest_id).cloned()
            })
            .collect())
    }

    async fn find_book(&self, book_id: &str) -> PortResult<Option<Book>> {
        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == book_id)
            .cloned())
    }

    async fn create_book(&self, book: &Book) -> PortResult<()> {
        let mut books = self.books.lock().unwrap();
        if books.iter().any(|b| b.id == book.id) {
            return Err(PortError::Conflict(format!(
                "book {} already exists",
                book.id
            )));
        }
        books.push(book.clone());
        Ok(())
    }

    async fn link_book(
        &self,
        user_id: Uuid,
        book_id: &str,
        daily_goal: f64,
    ) -> PortResult<LinkOutcome> {
        let mut entries = self.entries.lock().unwrap();
        if entries
            .iter()
            .any(|(_, e)| e.user_id == user_id && e.book_id == book_id)
        {
            return Ok(LinkOutcome::AlreadyLinked);
        }
        let mut seq = self.next_seq.lock().unwrap();
        *seq += 1;
        entries.push((
            *seq,
            ReadingEntry {
                user_id,
                book_id: book_id.to_string(),
                progress: 0.0,
                daily_goal,
                streak: 0,
                last_read_at: None,
                created_at: Utc::now(),
            },
        ));
        Ok(LinkOutcome::Linked)
    }

    async fn find_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
    ) -> PortResult<Option<ReadingEntry>> {
        Ok(self.entry(user_id, book_id))
    }

    async fn books_for_user(&self, user_id: Uuid) -> PortResult<Vec<RecommendedBook>> {
        let books = self.books.lock().unwrap();
        let mut rows: Vec<(u64, RecommendedBook)> = self
            .entries
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, e)| e.user_id == user_id)
            .filter_map(|(seq, e)| {
                books.iter().find(|b| b.id == e.book_id).map(|b| {
                    (
                        *seq,
                        RecommendedBook {
                            book: b.clone(),
                            progress: e.progress,
                            streak: e.streak,
                            created_at: e.created_at,
                        },
                    )
                })
            })
            .collect();
        rows.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(rows.into_iter().map(|(_, row)| row).collect())
    }

    async fn update_reading_entry(
        &self,
        user_id: Uuid,
        book_id: &str,
        progress: f64,
        streak: i32,
        last_read_at: DateTime<Utc>,
    ) -> PortResult<ReadingEntry> {
        let mut entries = self.entries.lock().unwrap();
        let (_, entry) = entries
            .iter_mut()
            .find(|(_, e)| e.user_id == user_id && e.book_id == book_id)
            .ok_or_else(|| {
                PortError::NotFound(format!("no reading entry for book {book_id}"))
            })?;
        entry.progress = progress;
        entry.streak = streak;
        entry.last_read_at = Some(last_read_at);
        *self.entry_updates.lock().unwrap() += 1;
        Ok(entry.clone())
    }
}

/// What the scripted provider should answer for a category.
pub enum ProviderScript {
    Book(Book),
    Nothing,
    Fail,
}

/// A [`BookMetadataProvider`] that answers from a script and records every
/// category it was asked about.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: HashMap<String, ProviderScript>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, category: &str, script: ProviderScript) -> Self {
        self.scripts.insert(category.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl BookMetadataProvider for ScriptedProvider {
    async fn find_by_category(&self, category: &str) -> PortResult<Option<Book>> {
        self.calls.lock().unwrap().push(category.to_string());
        match self.scripts.get(category) {
            Some(ProviderScript::Book(book)) => Ok(Some(book.clone())),
            Some(ProviderScript::Fail) => {
                Err(PortError::Upstream("scripted provider failure".to_string()))
            }
            Some(ProviderScript::Nothing) | None => Ok(None),
        }
    }
}

/// Leaves the category order untouched.
pub struct NoShuffle;

impl CategoryShuffler for NoShuffle {
    fn shuffle(&self, _categories: &mut [String]) {}
}

/// Reverses the category order; a fixed, obviously-non-identity permutation.
pub struct ReverseShuffle;

impl CategoryShuffler for ReverseShuffle {
    fn shuffle(&self, categories: &mut [String]) {
        categories.reverse();
    }
}
