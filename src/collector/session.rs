use anyhow::{Context, Result, anyhow};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use std::ffi::OsStr;
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const WINDOW_SIZE: (u32, u32) = (1920, 1080);

/// The browser operations a collection run needs
pub trait BrowserSession {
    fn navigate(&mut self, url: &str) -> Result<()>;
    fn page_source(&mut self) -> Result<String>;
    /// Terminate the browser. Must tolerate being called on a dead session.
    fn quit(&mut self);
}

/// Opens one isolated session per collection run
pub trait SessionFactory {
    type Session: BrowserSession;

    fn open(&self) -> Result<Self::Session>;
}

/// Where the browser executable comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowserBinary {
    /// Pre-installed at a fixed location (server hosts)
    Fixed(PathBuf),
    /// Looked up among local Chrome/Chromium installs (workstations)
    Discover,
}

/// Linux hosts are treated as servers with a system Chromium; anything else
/// is a workstation where the installed Chrome is located automatically.
pub fn resolve_binary(os: &str, configured: &Path) -> BrowserBinary {
    if os == "linux" {
        BrowserBinary::Fixed(configured.to_path_buf())
    } else {
        BrowserBinary::Discover
    }
}

#[derive(Debug, Clone)]
pub struct ChromeSessionFactory {
    binary: BrowserBinary,
}

impl ChromeSessionFactory {
    pub fn new(binary: BrowserBinary) -> Self {
        Self { binary }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(resolve_binary(std::env::consts::OS, &config.chrome_path))
    }

    fn executable(&self) -> Result<PathBuf> {
        match &self.binary {
            BrowserBinary::Fixed(path) => {
                info!("Using system browser at {}", path.display());
                Ok(path.clone())
            }
            BrowserBinary::Discover => {
                let path = headless_chrome::browser::default_executable()
                    .map_err(|e| anyhow!("No local Chrome installation found: {}", e))?;
                info!("Using discovered browser at {}", path.display());
                Ok(path)
            }
        }
    }
}

impl SessionFactory for ChromeSessionFactory {
    type Session = ChromeSession;

    fn open(&self) -> Result<ChromeSession> {
        let executable = self.executable()?;
        let user_agent = format!("--user-agent={}", USER_AGENT);

        let browser = Browser::new(
            LaunchOptionsBuilder::default()
                .headless(true)
                .sandbox(false)
                .window_size(Some(WINDOW_SIZE))
                .path(Some(executable))
                .idle_browser_timeout(Duration::from_secs(90))
                .args(vec![
                    OsStr::new("--disable-dev-shm-usage"),
                    OsStr::new("--disable-gpu"),
                    OsStr::new("--disable-blink-features=AutomationControlled"),
                    OsStr::new(&user_agent),
                ])
                .ignore_default_args(vec![OsStr::new("--enable-automation")])
                .build()
                .context("Invalid Chrome launch options")?,
        )
        .context("Failed to launch browser")?;

        if let Some(pid) = browser.get_process_id() {
            debug!("Browser process ID: {}", pid);
        }

        let tab = browser
            .new_tab()
            .context("Failed to create browser tab")?;

        Ok(ChromeSession {
            browser: Some(browser),
            tab: Some(tab),
        })
    }
}

pub struct ChromeSession {
    browser: Option<Browser>,
    tab: Option<Arc<Tab>>,
}

impl ChromeSession {
    fn tab(&self) -> Result<&Arc<Tab>> {
        self.tab
            .as_ref()
            .ok_or_else(|| anyhow!("Browser session already closed"))
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&mut self, url: &str) -> Result<()> {
        let tab = self.tab()?;
        tab.navigate_to(url)
            .with_context(|| format!("Failed to navigate to {}", url))?;
        tab.wait_until_navigated()
            .with_context(|| format!("Timed out loading {}", url))?;
        Ok(())
    }

    fn page_source(&mut self) -> Result<String> {
        self.tab()?
            .get_content()
            .context("Failed to get page content")
    }

    fn quit(&mut self) {
        if let Some(tab) = self.tab.take() {
            if let Err(e) = tab.close_target() {
                warn!("Failed to close tab: {}", e);
            }
        }
        // Dropping the Browser kills the child process
        if self.browser.take().is_some() {
            debug!("Browser process terminated");
        }
    }
}

/// Owns a session for the length of a run and quits it when dropped, so
/// every exit path (early `?` returns included) releases the browser.
pub struct SessionGuard<S: BrowserSession> {
    session: S,
}

impl<S: BrowserSession> SessionGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }
}

impl<S: BrowserSession> Deref for SessionGuard<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.session
    }
}

impl<S: BrowserSession> DerefMut for SessionGuard<S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut self.session
    }
}

impl<S: BrowserSession> Drop for SessionGuard<S> {
    fn drop(&mut self) {
        self.session.quit();
        debug!("Browser session released");
    }
}
