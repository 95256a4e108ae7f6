use std::path::PathBuf;

/// Options for launching a browser to pick from
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    /// Picking needs a visible window, so this defaults to `false`
    pub headless: bool,

    pub window_width: u32,
    pub window_height: u32,

    /// Chrome/Chromium binary; auto-detected when `None`
    pub chrome_path: Option<PathBuf>,

    /// Profile directory, so logins and cookies carry over
    pub user_data_dir: Option<PathBuf>,

    pub sandbox: bool,
}

impl Default for LaunchOptions {
    fn default() -> Self {
        Self {
            headless: false,
            window_width: 1280,
            window_height: 900,
            chrome_path: None,
            user_data_dir: None,
            sandbox: true,
        }
    }
}

impl LaunchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    pub fn chrome_path(mut self, path: PathBuf) -> Self {
        self.chrome_path = Some(path);
        self
    }

    pub fn user_data_dir(mut self, dir: PathBuf) -> Self {
        self.user_data_dir = Some(dir);
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.sandbox = sandbox;
        self
    }
}

/// Options for attaching to a browser that is already running
#[derive(Debug, Clone)]
pub struct ConnectionOptions {
    /// DevTools websocket URL (`ws://127.0.0.1:9222/devtools/browser/...`)
    pub ws_url: String,

    /// Idle timeout for the connection, in milliseconds
    pub timeout: u64,
}

impl ConnectionOptions {
    pub fn new(ws_url: impl Into<String>) -> Self {
        Self { ws_url: ws_url.into(), timeout: 60 * 60 * 1000 }
    }

    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picking_launches_headed() {
        let opts = LaunchOptions::default();
        assert!(!opts.headless);
        assert!(opts.sandbox);
        assert_eq!((opts.window_width, opts.window_height), (1280, 900));
    }

    #[test]
    fn test_launch_options_builder() {
        let opts = LaunchOptions::new()
            .window_size(800, 600)
            .chrome_path(PathBuf::from("/opt/chromium/chrome"))
            .user_data_dir(PathBuf::from("/tmp/profile"));

        assert_eq!(opts.window_width, 800);
        assert_eq!(opts.chrome_path.as_deref(), Some(std::path::Path::new("/opt/chromium/chrome")));
        assert!(opts.user_data_dir.is_some());
    }

    #[test]
    fn test_connection_timeout_defaults_to_an_hour() {
        let opts = ConnectionOptions::new("ws://127.0.0.1:9222/devtools/browser/abc");
        assert_eq!(opts.timeout, 3_600_000);
        assert_eq!(opts.timeout(5000).timeout, 5000);
    }
}
