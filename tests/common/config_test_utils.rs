use std::sync::{Mutex, OnceLock};
use tempfile::TempDir;

const FFTC_VARS: [&str; 4] = [
    "FFTC_TRANSFER__BUFFER_SIZE",
    "FFTC_TRANSFER__REPORT_INTERVAL",
    "FFTC_TRANSFER__SIZE_DECIMALS",
    "FFTC_LISTEN__BACKLOG",
];

fn env_lock() -> &'static Mutex<()> {
    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
}

struct EnvRestore {
    xdg_config_home: Option<std::ffi::OsString>,
    fftc_vars: Vec<(&'static str, Option<std::ffi::OsString>)>,
}

impl Drop for EnvRestore {
    fn drop(&mut self) {
        if let Some(value) = self.xdg_config_home.take() {
            std::env::set_var("XDG_CONFIG_HOME", value);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }

        for (name, value) in self.fftc_vars.drain(..) {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

fn write_config(temp_dir: &TempDir, contents: &str) {
    let app_config_dir = temp_dir.path().join("fftc");
    std::fs::create_dir_all(&app_config_dir).expect("create config dir");
    std::fs::write(app_config_dir.join("config.toml"), contents).expect("write config");
}

/// Run `f` with a private config dir holding `config_toml` and a clean
/// `FFTC_*` environment. Serialized across tests since env is process-wide.
pub fn with_config_env<T>(config_toml: &str, f: impl FnOnce() -> T) -> T {
    let _guard = env_lock().lock().unwrap_or_else(|e| e.into_inner());
    let temp_dir = TempDir::new().expect("temp dir");

    write_config(&temp_dir, config_toml);

    let restore = EnvRestore {
        xdg_config_home: std::env::var_os("XDG_CONFIG_HOME"),
        fftc_vars: FFTC_VARS
            .iter()
            .map(|name| (*name, std::env::var_os(name)))
            .collect(),
    };

    std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    for name in FFTC_VARS {
        std::env::remove_var(name);
    }

    let result = f();
    drop(restore);
    result
}
