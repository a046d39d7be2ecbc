//! Login state shared between the UI thread and background workers.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use crate::{SessionConfig, User};

/// Monotonic time source for session expiry.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// [`Clock`] backed by [`Instant::now`].
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Debug)]
enum State {
    LoggedOut,
    LoggedIn { user: User, login_at: Instant },
}

/// Who is logged in, and until when.
///
/// Expiry is evaluated lazily: nothing logs the user out when the timeout
/// passes, [`Session::is_logged_in`] simply starts returning `false`.
/// Share it as `Arc<Session>`.
pub struct Session {
    timeout: Duration,
    clock: Arc<dyn Clock>,
    state: RwLock<State>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("timeout", &self.timeout)
            .field("state", &*self.read())
            .finish()
    }
}

impl Session {
    pub fn new(timeout: Duration) -> Self {
        Self::with_clock(timeout, Arc::new(SystemClock))
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.timeout())
    }

    pub fn with_clock(timeout: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            timeout,
            clock,
            state: RwLock::new(State::LoggedOut),
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Logs `user` in and starts the expiry clock.
    pub fn set_current_user(&self, user: User) {
        let login_at = self.clock.now();

        #[cfg(feature = "tracing")]
        tracing::info!("user {} logged in as {}", user.account(), user.role().as_str());

        *self.write() = State::LoggedIn { user, login_at };
    }

    /// The logged-in user, or `None` when logged out or expired.
    pub fn current_user(&self) -> Option<User> {
        self.live(|user, _| user.clone())
    }

    pub fn is_logged_in(&self) -> bool {
        self.live(|_, _| ()).is_some()
    }

    /// Time left before expiry; zero when logged out or expired.
    pub fn remaining_session_time(&self) -> Duration {
        self.live(|_, elapsed| self.timeout.saturating_sub(elapsed))
            .unwrap_or(Duration::ZERO)
    }

    /// Time since login or the last refresh, while the session is live.
    pub fn session_age(&self) -> Option<Duration> {
        self.live(|_, elapsed| elapsed)
    }

    /// Restarts the expiry clock of a live session.
    ///
    /// Returns `false` when there was nothing to refresh; an expired session
    /// stays expired.
    pub fn refresh_session(&self) -> bool {
        let now = self.clock.now();
        let mut state = self.write();
        match &mut *state {
            State::LoggedIn { login_at, .. }
                if now.saturating_duration_since(*login_at) < self.timeout =>
            {
                *login_at = now;
                true
            }
            _ => false,
        }
    }

    pub fn logout(&self) {
        let previous = std::mem::replace(&mut *self.write(), State::LoggedOut);
        if let State::LoggedIn { user, .. } = previous {
            #[cfg(feature = "tracing")]
            tracing::info!("user {} logged out", user.account());
            #[cfg(not(feature = "tracing"))]
            drop(user);
        }
    }

    /// Edits the stored user in place, e.g. after a profile save.
    ///
    /// Does not touch the expiry clock. Returns `false` if no live session.
    pub fn update_user<F>(&self, edit: F) -> bool
    where
        F: FnOnce(&mut User),
    {
        let now = self.clock.now();
        let mut state = self.write();
        match &mut *state {
            State::LoggedIn { user, login_at }
                if now.saturating_duration_since(*login_at) < self.timeout =>
            {
                edit(user);
                true
            }
            _ => false,
        }
    }

    pub fn account(&self) -> Option<String> {
        self.live(|user, _| user.account().to_owned())
    }

    pub fn nickname(&self) -> Option<String> {
        self.live(|user, _| user.nickname().map(str::to_owned))
            .flatten()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.live(|user, _| user.id()).flatten()
    }

    /// Applies `f` to the user and elapsed time if the session is live.
    fn live<T, F>(&self, f: F) -> Option<T>
    where
        F: FnOnce(&User, Duration) -> T,
    {
        let now = self.clock.now();
        match &*self.read() {
            State::LoggedIn { user, login_at } => {
                let elapsed = now.saturating_duration_since(*login_at);
                (elapsed < self.timeout).then(|| f(user, elapsed))
            }
            State::LoggedOut => None,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, State> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, State> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;
    use std::time::{Duration, Instant};

    use super::{Clock, Session};
    use crate::{BuyerAccount, User, VendorAccount};

    #[derive(Debug)]
    struct ManualClock {
        start: Instant,
        offset: Mutex<Duration>,
    }

    impl ManualClock {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                start: Instant::now(),
                offset: Mutex::new(Duration::ZERO),
            })
        }

        fn advance(&self, by: Duration) {
            *self.offset.lock().expect("clock mutex must not be poisoned") += by;
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.start + *self.offset.lock().expect("clock mutex must not be poisoned")
        }
    }

    fn buyer() -> User {
        User::Buyer(BuyerAccount {
            id: Some(3),
            account: "kit".to_owned(),
            contact: None,
            nickname: Some("Kit".to_owned()),
        })
    }

    fn session(timeout_secs: u64) -> (Session, Arc<ManualClock>) {
        let clock = ManualClock::new();
        let session = Session::with_clock(Duration::from_secs(timeout_secs), clock.clone());
        (session, clock)
    }

    #[test]
    fn starts_logged_out() {
        let (session, _) = session(60);
        assert!(!session.is_logged_in());
        assert_eq!(session.current_user(), None);
        assert_eq!(session.remaining_session_time(), Duration::ZERO);
        assert!(!session.refresh_session());
    }

    #[test]
    fn login_then_logout() {
        let (session, _) = session(60);

        session.set_current_user(buyer());
        assert!(session.is_logged_in());
        assert_eq!(session.account().as_deref(), Some("kit"));
        assert_eq!(session.nickname().as_deref(), Some("Kit"));
        assert_eq!(session.user_id(), Some(3));
        assert_eq!(session.remaining_session_time(), Duration::from_secs(60));

        session.logout();
        assert!(!session.is_logged_in());
        assert_eq!(session.account(), None);
        assert_eq!(session.remaining_session_time(), Duration::ZERO);
    }

    #[test]
    fn expires_once_timeout_elapses() {
        let (session, clock) = session(60);
        session.set_current_user(buyer());

        clock.advance(Duration::from_secs(59));
        assert!(session.is_logged_in());
        assert_eq!(session.remaining_session_time(), Duration::from_secs(1));

        clock.advance(Duration::from_secs(1));
        assert!(!session.is_logged_in());
        assert_eq!(session.current_user(), None);
        assert_eq!(session.remaining_session_time(), Duration::ZERO);
        assert!(!session.refresh_session());
    }

    #[test]
    fn remaining_time_never_increases_without_refresh() {
        let (session, clock) = session(10);
        session.set_current_user(buyer());

        let mut last = session.remaining_session_time();
        for _ in 0..12 {
            clock.advance(Duration::from_secs(1));
            let now = session.remaining_session_time();
            assert!(now <= last);
            last = now;
        }
        assert_eq!(last, Duration::ZERO);
    }

    #[test]
    fn refresh_slides_the_expiry() {
        let (session, clock) = session(60);
        session.set_current_user(buyer());

        clock.advance(Duration::from_secs(50));
        assert!(session.refresh_session());
        assert_eq!(session.session_age(), Some(Duration::ZERO));

        clock.advance(Duration::from_secs(50));
        assert!(session.is_logged_in());
        assert_eq!(session.remaining_session_time(), Duration::from_secs(10));
    }

    #[test]
    fn update_user_edits_live_session_only() {
        let (session, clock) = session(60);
        assert!(!session.update_user(|_| {}));

        session.set_current_user(buyer());
        let renamed = session.update_user(|user| {
            if let User::Buyer(buyer) = user {
                buyer.nickname = Some("Kitty".to_owned());
            }
        });
        assert!(renamed);
        assert_eq!(session.nickname().as_deref(), Some("Kitty"));

        clock.advance(Duration::from_secs(60));
        assert!(!session.update_user(|_| {}));
    }

    #[test]
    fn vendors_have_no_nickname() {
        let (session, _) = session(60);
        session.set_current_user(User::Vendor(VendorAccount {
            account: "studio".to_owned(),
            ..VendorAccount::default()
        }));
        assert!(session.is_logged_in());
        assert_eq!(session.nickname(), None);
        assert_eq!(session.user_id(), None);
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let session = Arc::new(Session::new(Duration::from_secs(60)));

        let workers: Vec<_> = (0..8)
            .map(|i| {
                let session = Arc::clone(&session);
                thread::spawn(move || {
                    for _ in 0..200 {
                        if i % 2 == 0 {
                            session.set_current_user(buyer());
                        } else {
                            session.logout();
                        }
                        // Never a half-set state: a visible user always has an account.
                        if let Some(user) = session.current_user() {
                            assert_eq!(user.account(), "kit");
                        }
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker must not panic");
        }
    }
}
