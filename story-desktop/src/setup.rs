use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use anyhow::Context;
use env_logger::{Builder, Target};
use story_core::SystemConfig;

use crate::config_gen;

const CONFIG_PATH: &str = "config.toml";

/// Config first, logger second: the log filter and log directory come from
/// `[system]`.
pub fn init(interactive: bool) -> anyhow::Result<()> {
    config_gen::ensure_config_exists(CONFIG_PATH)?;

    if let Err(e) = story_shared::config::init(CONFIG_PATH) {
        eprintln!("Config load warning: {}", e);
    }

    init_logger(interactive)
}

fn init_logger(interactive: bool) -> anyhow::Result<()> {
    let sys_cfg: SystemConfig = story_shared::config::get("system");
    if let Err(e) = fs::create_dir_all(&sys_cfg.log_path) {
        eprintln!("Failed to create log dir: {}", e);
    }

    let log_file_path = Path::new(&sys_cfg.log_path).join("story.log");
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file_path)
        .with_context(|| format!("Failed to open log file {:?}", log_file_path))?;

    struct TeeWriter<W1, W2>(W1, W2);
    impl<W1: Write, W2: Write> Write for TeeWriter<W1, W2> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            let n = self.0.write(buf)?;
            self.1.write_all(&buf[..n])?;
            Ok(n)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            self.0.flush()?;
            self.1.flush()
        }
    }

    let mut builder = Builder::from_env(env_logger::Env::default().default_filter_or(&sys_cfg.log_level));
    // 交互模式下终端留给剧情文字，日志只进文件
    if interactive {
        builder.target(Target::Pipe(Box::new(log_file)));
    } else {
        builder.target(Target::Pipe(Box::new(TeeWriter(std::io::stderr(), log_file))));
    }

    builder.init();
    Ok(())
}
