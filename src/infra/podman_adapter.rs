use crate::domain::{
    CommandOutput, CommandRunner, ContainerRecord, ImageRecord, LogLevel, Version,
};
use crate::error::{PodmanError, Result};
use crate::infra::output;
use crate::infra::process_runner::ProcessRunner;
use std::sync::Arc;
use tracing::{debug, warn};

// Exit codes podman uses for `exists`, `rm` and `rmi`.
const EXIT_NOT_FOUND: i32 = 1;
const EXIT_IN_USE: i32 = 2;

/// Queries a podman-compatible runtime by shelling out to it.
///
/// Every call is a single, blocking invocation; nothing is cached between
/// calls.
#[derive(Debug, Clone)]
pub struct PodmanAdapter {
    runner: Arc<dyn CommandRunner>,
    log_level: Option<LogLevel>,
}

impl PodmanAdapter {
    pub fn new() -> Self {
        Self::with_runner(Arc::new(ProcessRunner::default()))
    }

    pub fn with_runner(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            log_level: None,
        }
    }

    /// Passes `--log-level` to every subsequent invocation.
    pub fn set_log_level(&mut self, level: Option<LogLevel>) {
        self.log_level = level;
    }

    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns `true` when the installed runtime is at least the minimum
    /// supported release and at least `required`.
    ///
    /// Never fails: an unparsable `required` or an unreachable runtime both
    /// count as "not satisfied".
    pub fn check_version(&self, required: &str) -> bool {
        let required: Version = match required.parse() {
            Ok(v) => v,
            Err(e) => {
                warn!("ignoring required version: {e}");
                return false;
            }
        };

        let current = match self.get_version() {
            Ok(v) => v,
            Err(e) => {
                warn!("could not determine podman version: {e}");
                return false;
            }
        };

        debug!(%current, %required, "comparing versions");
        current.is_supported() && current >= required
    }

    /// Returns `Ok(true)` when the container exists.
    ///
    /// An absent container is reported as [`PodmanError::NotFound`] rather
    /// than `Ok(false)`.
    pub fn container_exists(&self, name: &str) -> Result<bool> {
        let args = self.args(["container", "exists", name]);
        let output = self.invoke(&args)?;

        match output.code {
            Some(0) => Ok(true),
            Some(EXIT_NOT_FOUND) => Err(PodmanError::NotFound {
                name: name.to_string(),
            }),
            _ => Err(invocation_error(args, &output)),
        }
    }

    /// Lists containers via `podman ps --format json`, appending `extra`
    /// verbatim.
    pub fn get_containers<S: AsRef<str>>(&self, extra: &[S]) -> Result<Vec<ContainerRecord>> {
        let mut args = self.args(["ps", "--format", "json"]);
        args.extend(extra.iter().map(|a| a.as_ref().to_string()));

        let output = self.invoke_checked(args)?;
        output::parse_containers(&output.stdout)
    }

    pub fn get_version(&self) -> Result<Version> {
        let output = self.invoke_checked(self.args(["version", "--format", "json"]))?;
        output::parse_version(&output.stdout)
    }

    /// Returns `Ok(true)` when the image exists, [`PodmanError::ImageNotFound`]
    /// when it does not.
    pub fn image_exists(&self, image: &str) -> Result<bool> {
        let args = self.args(["image", "exists", image]);
        let output = self.invoke(&args)?;

        match output.code {
            Some(0) => Ok(true),
            Some(EXIT_NOT_FOUND) => Err(PodmanError::ImageNotFound {
                name: image.to_string(),
            }),
            _ => Err(invocation_error(args, &output)),
        }
    }

    pub fn get_images<S: AsRef<str>>(&self, extra: &[S]) -> Result<Vec<ImageRecord>> {
        let mut args = self.args(["images", "--format", "json"]);
        args.extend(extra.iter().map(|a| a.as_ref().to_string()));

        let output = self.invoke_checked(args)?;
        output::parse_images(&output.stdout)
    }

    /// Every container, running or not, carrying a toolbox label.
    pub fn get_toolbox_containers(&self) -> Result<Vec<ContainerRecord>> {
        Ok(self
            .get_containers(&["--all"])?
            .into_iter()
            .filter(ContainerRecord::is_toolbox)
            .collect())
    }

    pub fn get_toolbox_images(&self) -> Result<Vec<ImageRecord>> {
        Ok(self
            .get_images::<&str>(&[])?
            .into_iter()
            .filter(ImageRecord::is_toolbox)
            .collect())
    }

    pub fn remove_container(&self, name: &str, force: bool) -> Result<()> {
        let mut args = self.args(["rm"]);
        if force {
            args.push("--force".into());
        }
        args.push(name.into());

        let output = self.invoke(&args)?;
        match output.code {
            Some(0) => Ok(()),
            Some(EXIT_NOT_FOUND) => Err(PodmanError::NotFound {
                name: name.to_string(),
            }),
            Some(EXIT_IN_USE) => Err(PodmanError::ContainerRunning {
                name: name.to_string(),
            }),
            _ => Err(invocation_error(args, &output)),
        }
    }

    pub fn remove_image(&self, image: &str, force: bool) -> Result<()> {
        let mut args = self.args(["rmi"]);
        if force {
            args.push("--force".into());
        }
        args.push(image.into());

        let output = self.invoke(&args)?;
        match output.code {
            Some(0) => Ok(()),
            Some(EXIT_NOT_FOUND) => Err(PodmanError::ImageNotFound {
                name: image.to_string(),
            }),
            Some(EXIT_IN_USE) => Err(PodmanError::ImageInUse {
                name: image.to_string(),
            }),
            _ => Err(invocation_error(args, &output)),
        }
    }

    pub fn pull(&self, image: &str) -> Result<()> {
        self.invoke_checked(self.args(["pull", image]))?;
        Ok(())
    }

    fn args<'a>(&self, base: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(level) = self.log_level {
            args.push("--log-level".to_string());
            args.push(level.to_string());
        }
        args.extend(base.into_iter().map(String::from));
        args
    }

    fn invoke(&self, args: &[String]) -> Result<CommandOutput> {
        debug!(?args, "invoking podman");
        self.runner.run(args).map_err(|e| {
            warn!(?args, "podman could not be started: {e}");
            PodmanError::Invocation {
                args: args.to_vec(),
                stderr: e.to_string(),
            }
        })
    }

    fn invoke_checked(&self, args: Vec<String>) -> Result<CommandOutput> {
        let output = self.invoke(&args)?;
        if output.success() {
            return Ok(output);
        }
        Err(invocation_error(args, &output))
    }
}

impl Default for PodmanAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn invocation_error(args: Vec<String>, output: &CommandOutput) -> PodmanError {
    let stderr = output.stderr.trim().to_string();
    warn!(?args, code = ?output.code, %stderr, "podman failed");
    PodmanError::Invocation { args, stderr }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRunner;

    fn adapter() -> (PodmanAdapter, Arc<FakeRunner>) {
        let runner = Arc::new(FakeRunner::new());
        (PodmanAdapter::with_runner(runner.clone()), runner)
    }

    fn with_version(version: &str) -> PodmanAdapter {
        let (adapter, runner) = adapter();
        runner.respond_ok(
            "version --format json",
            &format!(r#"{{"Client": {{"Version": "{version}"}}}}"#),
        );
        adapter
    }

    #[test]
    fn test_check_version_required_greater_than_installed() {
        assert!(!with_version("4.3.1").check_version("10.1.1"));
    }

    #[test]
    fn test_check_version_required_lower_than_installed() {
        assert!(with_version("4.3.1").check_version("1.0.0"));
    }

    #[test]
    fn test_check_version_equal_is_satisfied() {
        assert!(with_version("4.3.1").check_version("4.3.1"));
    }

    #[test]
    fn test_check_version_numeric_ordering() {
        let adapter = with_version("4.10.0");
        assert!(adapter.check_version("4.9.9"));
        assert!(!adapter.check_version("4.10.1"));
    }

    #[test]
    fn test_check_version_below_baseline() {
        assert!(!with_version("1.3.0").check_version("1.0.0"));
    }

    #[test]
    fn test_check_version_malformed_required() {
        let adapter = with_version("4.3.1");
        assert!(!adapter.check_version("four"));
        assert!(!adapter.check_version("4.3"));
    }

    #[test]
    fn test_check_version_runtime_unavailable() {
        let (adapter, runner) = adapter();
        runner.fail_spawn("version --format json");
        assert!(!adapter.check_version("1.0.0"));
    }

    #[test]
    fn test_container_exists() {
        let (adapter, runner) = adapter();
        runner.respond_ok("container exists box", "");

        assert!(adapter.container_exists("box").unwrap());
        assert_eq!(runner.get_commands(), vec!["container exists box"]);
    }

    #[test]
    fn test_container_missing() {
        let (adapter, runner) = adapter();
        runner.respond("container exists container-1", 1, "", "");

        let err = adapter.container_exists("container-1").unwrap_err();
        assert_eq!(err.to_string(), "failed to find container container-1");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_container_exists_unexpected_exit() {
        let (adapter, runner) = adapter();
        runner.respond("container exists box", 125, "", "Error: boom");

        let err = adapter.container_exists("box").unwrap_err();
        assert_eq!(err.to_string(), "failed to invoke podman(1)");
    }

    #[test]
    fn test_get_containers() {
        let (adapter, runner) = adapter();
        runner.respond_ok(
            "ps --format json",
            r#"[{"Id": "a", "Names": ["one"]}, {"Id": "b", "Names": ["two"]}]"#,
        );

        let containers = adapter.get_containers::<&str>(&[]).unwrap();
        assert_eq!(containers.len(), 2);
    }

    #[test]
    fn test_get_containers_appends_args() {
        let (adapter, runner) = adapter();
        runner.respond_ok("ps --format json --all --filter label=x", "[]");

        let containers = adapter
            .get_containers(&["--all", "--filter", "label=x"])
            .unwrap();
        assert!(containers.is_empty());
    }

    #[test]
    fn test_get_containers_invalid_args() {
        let (adapter, runner) = adapter();
        runner.respond(
            "ps --format json invalid",
            125,
            "",
            "Error: `podman ps` takes no arguments",
        );

        let err = adapter.get_containers(&["invalid"]).unwrap_err();
        assert_eq!(err.to_string(), "failed to invoke podman(1)");
        match err {
            PodmanError::Invocation { stderr, .. } => {
                assert!(stderr.contains("takes no arguments"))
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_get_version() {
        let version = with_version("4.3.1").get_version().unwrap();
        assert_eq!(version.to_string().split('.').count(), 3);
    }

    #[test]
    fn test_get_version_unparsable() {
        let (adapter, runner) = adapter();
        runner.respond_ok("version --format json", "not json");

        let err = adapter.get_version().unwrap_err();
        assert!(matches!(err, PodmanError::Parse { .. }));
    }

    #[test]
    fn test_get_version_non_zero_exit_is_invocation() {
        let (adapter, runner) = adapter();
        runner.respond("version --format json", 125, "", "boom");

        match adapter.get_version().unwrap_err() {
            PodmanError::Invocation { args, stderr } => {
                assert_eq!(args, vec!["version", "--format", "json"]);
                assert_eq!(stderr, "boom");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_get_version_spawn_failure_is_invocation() {
        let (adapter, runner) = adapter();
        runner.fail_spawn("version --format json");

        assert!(matches!(
            adapter.get_version(),
            Err(PodmanError::Invocation { .. })
        ));
    }

    #[test]
    fn test_get_containers_spawn_failure() {
        let (adapter, runner) = adapter();
        runner.fail_spawn("ps --format json");

        let err = adapter.get_containers::<&str>(&[]).unwrap_err();
        assert_eq!(err.to_string(), "failed to invoke podman(1)");
        assert!(matches!(err, PodmanError::Invocation { .. }));
    }

    #[test]
    fn test_container_exists_spawn_failure() {
        let (adapter, runner) = adapter();
        runner.fail_spawn("container exists x");

        let err = adapter.container_exists("x").unwrap_err();
        assert!(matches!(err, PodmanError::Invocation { .. }));
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_killed_by_signal_is_invocation() {
        let (adapter, runner) = adapter();
        runner.respond_signal("container exists x");
        runner.respond_signal("ps --format json");

        let err = adapter.container_exists("x").unwrap_err();
        assert!(matches!(err, PodmanError::Invocation { .. }));
        assert!(!err.is_not_found());

        let err = adapter.get_containers::<&str>(&[]).unwrap_err();
        assert!(matches!(err, PodmanError::Invocation { .. }));
    }

    #[test]
    fn test_log_level_prefixes_every_call() {
        let (mut adapter, runner) = adapter();
        adapter.set_log_level(Some(LogLevel::Error));
        runner.respond_ok("--log-level error container exists box", "");
        runner.respond_ok("--log-level error ps --format json", "[]");

        adapter.container_exists("box").unwrap();
        adapter.get_containers::<&str>(&[]).unwrap();

        let commands = runner.get_commands();
        assert!(commands.iter().all(|c| c.starts_with("--log-level error ")));
    }

    #[test]
    fn test_image_exists_and_missing() {
        let (adapter, runner) = adapter();
        runner.respond_ok("image exists fedora", "");
        runner.respond("image exists nope", 1, "", "");

        assert!(adapter.image_exists("fedora").unwrap());
        let err = adapter.image_exists("nope").unwrap_err();
        assert_eq!(err.to_string(), "failed to find image nope");
    }

    #[test]
    fn test_toolbox_filters() {
        let (adapter, runner) = adapter();
        runner.respond_ok(
            "ps --format json --all",
            r#"[
                {"Id": "a", "Labels": {"com.github.containers.toolbox": "true"}},
                {"Id": "b", "Labels": null}
            ]"#,
        );
        runner.respond_ok(
            "images --format json",
            r#"[
                {"Id": "i1", "Labels": {"com.github.debarshiray.toolbox": "true"}},
                {"Id": "i2"}
            ]"#,
        );

        let containers = adapter.get_toolbox_containers().unwrap();
        assert_eq!(containers.len(), 1);
        assert_eq!(containers[0].id, "a");

        let images = adapter.get_toolbox_images().unwrap();
        assert_eq!(images.len(), 1);
        assert_eq!(images[0].id, "i1");
    }

    #[test]
    fn test_remove_container_exit_codes() {
        let (adapter, runner) = adapter();
        runner.respond_ok("rm --force gone", "");
        runner.respond("rm missing", 1, "", "");
        runner.respond("rm busy", 2, "", "");

        assert!(adapter.remove_container("gone", true).is_ok());
        assert!(matches!(
            adapter.remove_container("missing", false),
            Err(PodmanError::NotFound { .. })
        ));
        assert_eq!(
            adapter.remove_container("busy", false).unwrap_err().to_string(),
            "container busy is running"
        );
    }

    #[test]
    fn test_remove_image_exit_codes() {
        let (adapter, runner) = adapter();
        runner.respond_ok("rmi fedora", "");
        runner.respond("rmi missing", 1, "", "");
        runner.respond("rmi base", 2, "", "");

        assert!(adapter.remove_image("fedora", false).is_ok());
        assert!(matches!(
            adapter.remove_image("missing", false),
            Err(PodmanError::ImageNotFound { .. })
        ));
        assert!(matches!(
            adapter.remove_image("base", false),
            Err(PodmanError::ImageInUse { .. })
        ));
    }

    #[test]
    fn test_pull_failure() {
        let (adapter, runner) = adapter();
        runner.respond("pull bad/image", 125, "", "Error: unauthorized");

        let err = adapter.pull("bad/image").unwrap_err();
        assert_eq!(err.to_string(), "failed to invoke podman(1)");
    }
}
