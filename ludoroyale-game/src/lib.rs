//! Ludo Royale Game Engine
//!
//! Platform-agnostic core game logic for Ludo Royale, an entry-fee Ludo
//! variant with adaptive dice control. This crate provides all game
//! mechanics without UI or platform-specific dependencies.

pub mod board;
pub mod constants;
pub mod dice;
pub mod estimator;
pub mod impact;
pub mod numbers;
pub mod player;
pub mod profile;
pub mod rng;
pub mod session;
pub mod strategy;
pub mod trace;

// Re-export commonly used types
pub use board::{Board, Capture, Square};
pub use dice::{DiceController, TurnContext, era_coefficient};
pub use estimator::estimate;
pub use impact::capture_impact;
pub use player::{Color, MoveOutcome, PiecePos, Player};
pub use profile::Profile;
pub use rng::RngBundle;
pub use session::{GameSession, SessionError, TurnRecord};
pub use trace::{DecisionTrace, Stage};

/// Trait for abstracting profile persistence.
/// Platform-specific implementations should provide this.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save the player profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be saved.
    fn save_profile(&self, profile: &Profile) -> Result<(), Self::Error>;

    /// Load the player profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded.
    fn load_profile(&self) -> Result<Option<Profile>, Self::Error>;

    /// Delete the stored profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be deleted.
    fn delete_profile(&self) -> Result<(), Self::Error>;
}

/// Main engine facade for managing matches against a profile store.
pub struct LudoEngine<S>
where
    S: ProfileStorage,
{
    storage: S,
}

impl<S> LudoEngine<S>
where
    S: ProfileStorage,
{
    /// Create a new engine backed by the provided profile storage.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Start a match from the stored profile (or a fresh one).
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be loaded or the entry fee
    /// cannot be covered.
    pub fn create_session(&self, seed: u64, bot_count: usize) -> Result<GameSession, anyhow::Error>
    where
        S::Error: Into<anyhow::Error>,
    {
        let profile = self
            .storage
            .load_profile()
            .map_err(Into::into)?
            .unwrap_or_default();
        GameSession::new(seed, bot_count, profile).map_err(Into::into)
    }

    /// Persist the profile a finished (or abandoned) match settled into.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile cannot be saved.
    pub fn finish_session(&self, session: GameSession) -> Result<Profile, S::Error> {
        let profile = session.into_profile();
        self.storage.save_profile(&profile)?;
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::convert::Infallible;
    use std::rc::Rc;

    #[derive(Clone, Default)]
    struct MemoryStorage {
        profile: Rc<RefCell<Option<Profile>>>,
    }

    impl ProfileStorage for MemoryStorage {
        type Error = Infallible;

        fn save_profile(&self, profile: &Profile) -> Result<(), Self::Error> {
            *self.profile.borrow_mut() = Some(profile.clone());
            Ok(())
        }

        fn load_profile(&self) -> Result<Option<Profile>, Self::Error> {
            Ok(self.profile.borrow().clone())
        }

        fn delete_profile(&self) -> Result<(), Self::Error> {
            *self.profile.borrow_mut() = None;
            Ok(())
        }
    }

    #[test]
    fn engine_creates_and_settles_a_match() {
        let storage = MemoryStorage::default();
        let engine = LudoEngine::new(storage.clone());
        let mut session = engine.create_session(0xABCD, 2).unwrap();
        assert_eq!(session.players().len(), 3);
        session.run_to_completion(5_000);
        let profile = engine.finish_session(session).unwrap();
        assert_eq!(storage.load_profile().unwrap(), Some(profile));
    }

    #[test]
    fn missing_profile_starts_from_defaults() {
        let engine = LudoEngine::new(MemoryStorage::default());
        let session = engine.create_session(7, 3).unwrap();
        // Default balance 500 minus the 100 entry fee.
        assert_eq!(session.profile().balance, 400);
    }

    #[test]
    fn delete_clears_the_store() {
        let storage = MemoryStorage::default();
        storage.save_profile(&Profile::default()).unwrap();
        storage.delete_profile().unwrap();
        assert_eq!(storage.load_profile().unwrap(), None);
    }
}
