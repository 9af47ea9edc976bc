//! Downstream book renderer (`mdbook build` by default).

use std::path::Path;
use std::process::Command;

use tracing::{info, instrument};

use bookgen_shared::{BookgenError, RendererConfig, Result};

/// Run the configured renderer in `book_dir`, inheriting stdio.
///
/// Spawn failures and non-zero exits become [`BookgenError::Render`]; the
/// renderer's own output is not inspected.
#[instrument(skip_all, fields(command = %renderer.command, book_dir = %book_dir.display()))]
pub fn run_renderer(renderer: &RendererConfig, book_dir: &Path) -> Result<()> {
    let status = Command::new(&renderer.command)
        .args(&renderer.args)
        .current_dir(book_dir)
        .status()
        .map_err(|e| BookgenError::Render(format!("failed to spawn {}: {e}", renderer.command)))?;

    if !status.success() {
        let code = status
            .code()
            .map_or_else(|| "terminated by signal".to_string(), |c| c.to_string());
        return Err(BookgenError::Render(format!(
            "{} exited with status: {code}",
            renderer.command
        )));
    }

    info!("renderer finished");
    Ok(())
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn renderer(command: &str) -> RendererConfig {
        RendererConfig {
            enabled: true,
            command: command.into(),
            args: vec![],
        }
    }

    #[test]
    fn success_is_ok() {
        run_renderer(&renderer("true"), &std::env::temp_dir()).unwrap();
    }

    #[test]
    fn failure_status_propagates() {
        let err = run_renderer(&renderer("false"), &std::env::temp_dir()).unwrap_err();
        assert!(err.to_string().contains("false exited with status: 1"));
    }

    #[test]
    fn missing_program_propagates() {
        let err = run_renderer(
            &renderer("bookgen-no-such-renderer"),
            &std::env::temp_dir(),
        )
        .unwrap_err();
        assert!(matches!(err, BookgenError::Render(_)));
        assert!(err.to_string().contains("failed to spawn"));
    }

    #[test]
    fn runs_in_book_dir_with_args() {
        let config = RendererConfig {
            enabled: true,
            command: "sh".into(),
            args: vec!["-c".into(), "test -f book.toml".into()],
        };
        let tmp = std::env::temp_dir().join(format!("bookgen-render-test-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(&tmp).unwrap();

        assert!(run_renderer(&config, &tmp).is_err());
        std::fs::write(tmp.join("book.toml"), "").unwrap();
        run_renderer(&config, &tmp).unwrap();

        let _ = std::fs::remove_dir_all(&tmp);
    }
}
