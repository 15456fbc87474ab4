//! Root application module.
//!
//! Contains the main App component and the AppContext shared by every
//! screen: who is logged in and which notices are on screen.

use dfs_console_core::{ApiError, Notice};
use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::components::{AppRouter, NoticeStack};
use crate::config::{MAX_NOTICES, NOTICE_LIFETIME_MS};
use crate::utils;

// ============================================================================
// Notices
// ============================================================================

/// A notice currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct ShownNotice {
    pub id: u64,
    pub notice: Notice,
}

// ============================================================================
// AppContext
// ============================================================================

/// Application-wide reactive context.
///
/// Provided at the root of the component tree and accessed with
/// `use_context::<AppContext>()`. All fields are signals, so the struct is
/// `Copy`.
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Logged-in username, mirrored from the persisted session token.
    pub user: RwSignal<Option<String>>,
    /// Notices on screen, oldest first.
    pub notices: RwSignal<Vec<ShownNotice>>,
    next_notice_id: StoredValue<u64>,
}

impl AppContext {
    /// Creates the context, restoring the session from localStorage.
    pub fn new() -> Self {
        Self {
            user: RwSignal::new(utils::client().session().token()),
            notices: RwSignal::new(Vec::new()),
            next_notice_id: StoredValue::new(0),
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.user.with(Option::is_some)
    }

    /// Show a notice and schedule its removal.
    pub fn notify(&self, notice: Notice) {
        let id = self.next_notice_id.get_value();
        self.next_notice_id.set_value(id + 1);

        self.notices.update(|list| {
            list.push(ShownNotice { id, notice });
            if list.len() > MAX_NOTICES {
                let overflow = list.len() - MAX_NOTICES;
                list.drain(..overflow);
            }
        });

        let notices = self.notices;
        Timeout::new(NOTICE_LIFETIME_MS, move || {
            notices.try_update(|list| list.retain(|n| n.id != id));
        })
        .forget();
    }

    /// Show a notice if there is one.
    pub fn notify_opt(&self, notice: Option<Notice>) {
        if let Some(notice) = notice {
            self.notify(notice);
        }
    }

    /// Surface a failed call: server rejections become an error notice,
    /// everything else is only logged.
    pub fn report(&self, action: &str, error: ApiError) {
        if error.is_user_visible() {
            self.notify(Notice::error(error.to_string()));
        } else {
            log::warn!("{} failed: {}", action, error);
        }
    }

    pub fn dismiss(&self, id: u64) {
        self.notices.update(|list| list.retain(|n| n.id != id));
    }

    /// Record a successful login.
    pub fn logged_in(&self, username: String) {
        self.user.set(Some(username));
    }

    /// Clear the session and forget the user.
    pub fn logout(&self) {
        if let Err(e) = utils::client().logout() {
            log::warn!("logout: {}", e);
        }
        self.user.set(None);
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Root application component with error boundary.
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    provide_context(ctx);

    view! {
        <ErrorBoundary
            fallback=|errors| view! {
                <div style="
                    display: flex;
                    flex-direction: column;
                    align-items: center;
                    justify-content: center;
                    height: 100vh;
                    padding: 2rem;
                    background: #f0f2f5;
                    color: #262626;
                    font-family: -apple-system, 'Segoe UI', sans-serif;
                ">
                    <div style="max-width: 600px; text-align: center;">
                        <h1 style="color: #cf1322; margin-bottom: 1rem;">
                            "Something went wrong"
                        </h1>
                        <p style="color: #595959; margin-bottom: 2rem;">
                            "An unexpected error occurred. Please try reloading the page."
                        </p>
                        <ul style="text-align: left; color: #cf1322; font-size: 0.9rem;">
                            {move || errors.get()
                                .into_iter()
                                .map(|(_, e)| view! { <li>{e.to_string()}</li> })
                                .collect::<Vec<_>>()
                            }
                        </ul>
                        <button
                            on:click=move |_| {
                                if let Some(window) = web_sys::window() {
                                    let _ = window.location().reload();
                                }
                            }
                            style="
                                background: #1677ff;
                                color: white;
                                border: none;
                                padding: 0.5rem 1.5rem;
                                border-radius: 6px;
                                cursor: pointer;
                            "
                        >
                            "Reload Page"
                        </button>
                    </div>
                </div>
            }
        >
            <AppRouter />
            <NoticeStack />
        </ErrorBoundary>
    }
}
