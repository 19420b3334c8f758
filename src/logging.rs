use chrono::Local;
use env_logger::{Builder, Env, Target};
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};

/// Copies every formatted log line to stderr and to the meter log file.
struct TeeWriter {
    file: File,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        io::stderr().write_all(buf)?;
        self.file.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stderr().flush()?;
        self.file.flush()
    }
}

/// Initializes process logging. Lines reach the terminal and append to
/// `log_file` (created on first write) as
/// `YYYY-MM-DD HH:MM:SS,mmm - <target> - <LEVEL> - <message>`.
/// The filter defaults to info and still honors `RUST_LOG`.
pub fn init(log_file: &str) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().append(true).create(true).open(log_file)?;
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} - {} - {} - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S,%3f"),
                record.target(),
                record.level(),
                record.args()
            )
        })
        .target(Target::Pipe(Box::new(TeeWriter { file })))
        .try_init()?;
    Ok(())
}

/// Contents of the meter log for the "view log" screen. A missing file is
/// reported as a sentinel line rather than an error; the log only exists
/// once something has been logged.
pub fn read_log(path: &str) -> String {
    match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => String::from("log file not found."),
        Err(e) => format!("could not read log file: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("taximeter-logging-{}-{}", std::process::id(), name))
    }

    #[test]
    fn missing_log_reads_as_sentinel() {
        let path = scratch_path("absent.log");
        assert_eq!(read_log(path.to_str().unwrap()), "log file not found.");
    }

    #[test]
    fn existing_log_reads_back_verbatim() {
        let path = scratch_path("present.log");
        fs::write(
            &path,
            "2026-01-01 00:00:00,000 - taximeter - INFO - ride started\n",
        )
        .unwrap();
        let contents = read_log(path.to_str().unwrap());
        assert!(contents.contains("INFO - ride started"));
        let _ = fs::remove_file(&path);
    }
}
