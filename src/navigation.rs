//! App shell routing

use std::fmt;

use crate::auth::AuthState;

/// Bottom tabs of the signed-in shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Feeds,
    Post,
    Profile,
}

impl Tab {
    pub const ALL: [Self; 3] = [Self::Feeds, Self::Post, Self::Profile];

    pub fn label(self) -> &'static str {
        match self {
            Self::Feeds => "Feeds",
            Self::Post => "Post",
            Self::Profile => "Profile",
        }
    }

    /// Icon name, outlined when not focused
    pub fn icon(self, focused: bool) -> &'static str {
        match (self, focused) {
            (Self::Feeds, true) => "home",
            (Self::Feeds, false) => "home-outline",
            (Self::Post, true) => "add-circle",
            (Self::Post, false) => "add-circle-outline",
            (Self::Profile, true) => "person",
            (Self::Profile, false) => "person-outline",
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Shown while the stored session is being checked
    Splash,
    Login,
    SignUp,
    Tabs(Tab),
}

impl Route {
    /// Screens reachable without a session
    pub fn is_public(self) -> bool {
        matches!(self, Self::Splash | Self::Login | Self::SignUp)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Splash => f.write_str("Splash"),
            Self::Login => f.write_str("Login"),
            Self::SignUp => f.write_str("SignUp"),
            Self::Tabs(tab) => write!(f, "Tabs/{}", tab.label()),
        }
    }
}

/// Where the app opens for the given session state
pub fn initial_route(state: &AuthState) -> Route {
    if !state.is_initialized {
        Route::Splash
    } else if state.is_authenticated {
        Route::Tabs(Tab::default())
    } else {
        Route::Login
    }
}

/// Resolve a requested screen, bouncing to login without a session
pub fn guard(requested: Route, state: &AuthState) -> Route {
    match requested {
        Route::Tabs(_) if !state.is_authenticated => initial_route(state),
        Route::Login | Route::SignUp if state.is_authenticated => Route::Tabs(Tab::default()),
        other => other,
    }
}
