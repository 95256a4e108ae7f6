use crate::{browser::config::{ConnectionOptions, LaunchOptions},
            browser::page::CdpPage,
            browser::restriction::normalize_url,
            clipboard::ImageViewer,
            error::{ClipError, Result}};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use headless_chrome::{Browser, Tab};
use std::{ffi::OsStr, sync::Arc, time::Duration};

/// A Chrome instance to pick from, launched by us or attached to
pub struct BrowserSession {
    browser: Browser,
}

/// Map our options onto headless_chrome's
fn chrome_launch_options(options: LaunchOptions) -> Result<headless_chrome::LaunchOptions<'static>> {
    headless_chrome::LaunchOptions::default_builder()
        .headless(options.headless)
        .sandbox(options.sandbox)
        .window_size(Some((options.window_width, options.window_height)))
        .path(options.chrome_path)
        .user_data_dir(options.user_data_dir)
        // A picking session can sit idle for a long time; the default is 30 seconds
        .idle_browser_timeout(Duration::from_secs(60 * 60))
        // Keep the automation banner off the page being picked from
        .ignore_default_args(vec![OsStr::new("--enable-automation")])
        .args(vec![OsStr::new("--disable-blink-features=AutomationControlled")])
        .build()
        .map_err(|e| ClipError::LaunchFailed(format!("Invalid launch options: {}", e)))
}

impl BrowserSession {
    /// Start a browser with one blank tab
    pub fn launch(options: LaunchOptions) -> Result<Self> {
        let headless = options.headless;
        let browser = Browser::new(chrome_launch_options(options)?).map_err(|e| ClipError::LaunchFailed(e.to_string()))?;

        browser
            .new_tab()
            .map_err(|e| ClipError::LaunchFailed(format!("Failed to open the first tab: {}", e)))?;

        log::info!("Launched browser (headless: {})", headless);
        Ok(Self { browser })
    }

    /// Attach to a browser started with `--remote-debugging-port`
    pub fn connect(options: ConnectionOptions) -> Result<Self> {
        let browser = Browser::connect_with_timeout(options.ws_url.clone(), Duration::from_millis(options.timeout))
            .map_err(|e| ClipError::ConnectionFailed(e.to_string()))?;

        log::info!("Connected to browser at {}", options.ws_url);
        Ok(Self { browser })
    }

    /// Get the active tab
    pub fn tab(&self) -> Result<Arc<Tab>> {
        self.get_active_tab()
    }

    /// Create a new tab
    pub fn new_tab(&self) -> Result<Arc<Tab>> {
        self.browser
            .new_tab()
            .map_err(|e| ClipError::TabOperationFailed(format!("Failed to create tab: {}", e)))
    }

    /// Get all tabs
    pub fn get_tabs(&self) -> Result<Vec<Arc<Tab>>> {
        let tabs = self
            .browser
            .get_tabs()
            .lock()
            .map_err(|e| ClipError::TabOperationFailed(format!("Failed to get tabs: {}", e)))?
            .clone();

        Ok(tabs)
    }

    /// Get the currently active tab by checking the document visibility and focus state
    pub fn get_active_tab(&self) -> Result<Arc<Tab>> {
        let tabs = self.get_tabs()?;

        // Visible and focused first, then merely visible
        for check in ["document.visibilityState === 'visible' && document.hasFocus()", "document.visibilityState === 'visible'"]
        {
            for tab in &tabs {
                match tab.evaluate(check, false) {
                    Ok(remote_object) => {
                        if remote_object.value.and_then(|v| v.as_bool()).unwrap_or(false) {
                            return Ok(tab.clone());
                        }
                    }
                    Err(e) => log::debug!("Failed to check tab status: {}", e),
                }
            }
        }

        // Headless tabs are never visible; any tab will do
        tabs.into_iter()
            .next()
            .ok_or_else(|| ClipError::TabOperationFailed("No active tab found".to_string()))
    }

    /// Navigate to a URL using the active tab
    pub fn navigate(&self, url: &str) -> Result<()> {
        let url = normalize_url(url);
        self.tab()?
            .navigate_to(&url)
            .map_err(|e| ClipError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        Ok(())
    }

    /// Wait for navigation to complete
    pub fn wait_for_navigation(&self) -> Result<()> {
        self.tab()?
            .wait_until_navigated()
            .map_err(|e| ClipError::NavigationFailed(format!("Navigation timeout: {}", e)))?;

        Ok(())
    }

    /// Install the picker into the active tab
    pub fn active_page(&self) -> Result<CdpPage> {
        CdpPage::attach(self.tab()?)
    }

    /// Navigate the active tab to `url`, wait for it, and install the picker
    pub fn open_page(&self, url: &str) -> Result<CdpPage> {
        self.navigate(url)?;
        self.wait_for_navigation()?;
        self.active_page()
    }
}

/// Opens images the clipboard refused in a tab of their own
impl ImageViewer for BrowserSession {
    fn open_image(&self, bytes: &[u8], mime_type: &str) -> Result<()> {
        let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
        let tab = self.new_tab()?;
        tab.navigate_to(&data_url)
            .map_err(|e| ClipError::NavigationFailed(format!("Failed to open image tab: {}", e)))?;
        tab.activate()
            .map_err(|e| ClipError::TabOperationFailed(format!("Failed to focus image tab: {}", e)))?;
        log::info!("Opened {} byte {} in a new tab", bytes.len(), mime_type);
        Ok(())
    }
}
