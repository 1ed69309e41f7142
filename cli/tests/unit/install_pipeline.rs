//! Unit tests for the install pipeline, driven entirely through fake ports.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use silex_deploy::application::ports::{
    ComposeStack, ContainerLogs, EnvFileStore, PackageManager, ProgressReporter, ServiceManager,
    Sleeper, UserDirectory,
};
use silex_deploy::application::services::install::{InstallOptions, InstallOutcome, install};
use silex_deploy::domain::config::{DeployConfig, RegistryConfig};
use silex_deploy::domain::env_file::EnvFile;
use silex_deploy::domain::readiness::{DeploymentTarget, ReadinessOutcome};
use silex_deploy::domain::user::{Account, Identity, ProvisionOutcome};

// ── Fakes ────────────────────────────────────────────────────────────────────

/// Records every host and compose call in one shared, ordered log.
#[derive(Default)]
struct FakeHost {
    calls: RefCell<Vec<String>>,
    fail_on: Option<&'static str>,
}

impl FakeHost {
    fn record(&self, call: impl Into<String>) -> Result<()> {
        let call = call.into();
        let failing = self.fail_on.is_some_and(|f| call == f);
        self.calls.borrow_mut().push(call);
        if failing {
            anyhow::bail!("exit status 1");
        }
        Ok(())
    }

    fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl PackageManager for FakeHost {
    async fn refresh(&self) -> Result<()> {
        self.record("apt update")
    }
    async fn upgrade(&self) -> Result<()> {
        self.record("apt upgrade")
    }
    async fn install(&self, _packages: &[String]) -> Result<()> {
        self.record("apt install")
    }
    async fn install_snap(&self, name: &str) -> Result<()> {
        self.record(format!("snap {name}"))
    }
}

impl ServiceManager for FakeHost {
    async fn enable_now(&self, unit: &str) -> Result<()> {
        self.record(format!("enable {unit}"))
    }
    async fn add_to_group(&self, user: &str, group: &str) -> Result<()> {
        self.record(format!("group {user} {group}"))
    }
}

impl ComposeStack for FakeHost {
    async fn login(&self, server: &str, _username: &str, _password: &str) -> Result<()> {
        self.record(format!("login {server}"))
    }
    async fn build(&self) -> Result<()> {
        self.record("build")
    }
    async fn down(&self) -> Result<()> {
        self.record("down")
    }
    async fn up(&self) -> Result<()> {
        self.record("up")
    }
    async fn restart(&self) -> Result<()> {
        self.record("restart")
    }
}

/// Application container: reports ready on attempt `ready_on`, and keeps a
/// user list that `create_user` appends to.
struct FakeContainer {
    ready_on: Option<u32>,
    fetches: Cell<u32>,
    users: RefCell<BTreeSet<Identity>>,
    creates: Cell<u32>,
    fail_create: bool,
}

impl FakeContainer {
    fn ready_on(attempt: u32) -> Self {
        Self {
            ready_on: Some(attempt),
            fetches: Cell::new(0),
            users: RefCell::new(BTreeSet::new()),
            creates: Cell::new(0),
            fail_create: false,
        }
    }

    fn never_ready() -> Self {
        Self {
            ready_on: None,
            ..Self::ready_on(0)
        }
    }
}

impl ContainerLogs for FakeContainer {
    async fn fetch_log_tail(&self, _target: &DeploymentTarget) -> Result<Vec<String>> {
        let n = self.fetches.get() + 1;
        self.fetches.set(n);
        if self.ready_on.is_some_and(|r| n >= r) {
            Ok(vec!["INFO Server startup in [9120] milliseconds".to_string()])
        } else {
            Ok(vec!["INFO Deploying web application".to_string()])
        }
    }
}

impl UserDirectory for FakeContainer {
    async fn list_users(&self) -> Result<BTreeSet<Identity>> {
        Ok(self.users.borrow().clone())
    }

    async fn create_user(&self, account: &Account) -> Result<()> {
        self.creates.set(self.creates.get() + 1);
        if self.fail_create {
            anyhow::bail!("Creating user '{}' failed (exit code 1)", account.identity);
        }
        self.users.borrow_mut().insert(account.identity.clone());
        Ok(())
    }
}

#[derive(Default)]
struct MemEnvStore {
    files: RefCell<HashMap<PathBuf, String>>,
}

impl EnvFileStore for MemEnvStore {
    async fn load(&self, path: &Path) -> Result<EnvFile> {
        Ok(self
            .files
            .borrow()
            .get(path)
            .map(|c| EnvFile::parse(c))
            .unwrap_or_default())
    }

    async fn save(&self, path: &Path, env: &EnvFile) -> Result<()> {
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), env.render());
        Ok(())
    }
}

#[derive(Default)]
struct TotalSleeper {
    total: Cell<Duration>,
}

impl Sleeper for TotalSleeper {
    async fn sleep(&self, duration: Duration) {
        self.total.set(self.total.get() + duration);
    }
}

#[derive(Default)]
struct CapturingReporter {
    warnings: RefCell<Vec<String>>,
}

impl ProgressReporter for CapturingReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }
}

fn config() -> DeployConfig {
    let mut cfg = DeployConfig::default();
    cfg.stack.project_dir = PathBuf::from("/srv/opensilex");
    cfg
}

fn opts(config: &DeployConfig) -> InstallOptions<'_> {
    InstallOptions {
        config,
        skip_host_setup: false,
        operator: Some("debian"),
        registry_password: None,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_ready_stack_gets_admin_user_once() {
    let cfg = config();
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(3);
    let env = MemEnvStore::default();
    let sleeper = TotalSleeper::default();
    let reporter = CapturingReporter::default();

    let outcome = install(&host, &host, &host, &app, &env, &sleeper, &reporter, opts(&cfg))
        .await
        .expect("install should succeed");

    assert_eq!(
        outcome,
        InstallOutcome::Ready {
            readiness: ReadinessOutcome::Ready {
                attempts: 3,
                elapsed: Duration::from_secs(10),
            },
            user: ProvisionOutcome::Created,
        }
    );
    assert_eq!(app.creates.get(), 1);
    assert_eq!(
        host.calls(),
        [
            "apt update",
            "apt upgrade",
            "apt install",
            "enable docker",
            "group debian docker",
            "down",
            "up",
        ]
    );
}

#[tokio::test]
async fn test_second_run_leaves_user_and_env_untouched() {
    let cfg = config();
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(1);
    let env = MemEnvStore::default();
    let sleeper = TotalSleeper::default();
    let reporter = CapturingReporter::default();

    install(&host, &host, &host, &app, &env, &sleeper, &reporter, opts(&cfg))
        .await
        .expect("first run");
    let first = env.files.borrow().clone();
    let second = install(&host, &host, &host, &app, &env, &sleeper, &reporter, opts(&cfg))
        .await
        .expect("second run");

    assert!(matches!(
        second,
        InstallOutcome::Ready {
            user: ProvisionOutcome::AlreadyExists,
            ..
        }
    ));
    assert_eq!(app.creates.get(), 1);
    assert_eq!(*env.files.borrow(), first);

    let rendered = &first[Path::new("/srv/opensilex/.env")];
    assert_eq!(
        rendered
            .lines()
            .filter(|l| l.starts_with("OPENSILEX_CONFIG_THEME="))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_timeout_skips_user_and_points_at_logs() {
    let cfg = config();
    let host = FakeHost::default();
    let app = FakeContainer::never_ready();
    let env = MemEnvStore::default();
    let sleeper = TotalSleeper::default();
    let reporter = CapturingReporter::default();

    let outcome = install(&host, &host, &host, &app, &env, &sleeper, &reporter, opts(&cfg))
        .await
        .expect("a timeout is not an error");

    assert_eq!(
        outcome,
        InstallOutcome::NotReady {
            readiness: ReadinessOutcome::TimedOut {
                attempts: 36,
                elapsed: Duration::from_secs(180),
            },
        }
    );
    assert_eq!(app.fetches.get(), 36);
    assert_eq!(app.creates.get(), 0);
    assert_eq!(sleeper.total.get(), Duration::from_secs(180));
    assert!(
        reporter
            .warnings
            .borrow()
            .iter()
            .any(|w| w.contains("docker logs -f opensilex-docker-opensilexapp")),
        "warnings: {:?}",
        reporter.warnings.borrow()
    );
}

#[tokio::test]
async fn test_skip_host_setup_goes_straight_to_compose() {
    let cfg = config();
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(1);
    let env = MemEnvStore::default();

    install(
        &host,
        &host,
        &host,
        &app,
        &env,
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        InstallOptions {
            skip_host_setup: true,
            ..opts(&cfg)
        },
    )
    .await
    .expect("install");

    assert_eq!(host.calls(), ["down", "up"]);
}

#[tokio::test]
async fn test_registry_and_build_run_before_down() {
    let mut cfg = config();
    cfg.stack.build = true;
    cfg.stack.registry = Some(RegistryConfig {
        server: "registry.example.org".to_string(),
        username: "deploy".to_string(),
    });
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(1);

    install(
        &host,
        &host,
        &host,
        &app,
        &MemEnvStore::default(),
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        InstallOptions {
            skip_host_setup: true,
            registry_password: Some("t0ken"),
            ..opts(&cfg)
        },
    )
    .await
    .expect("install");

    assert_eq!(
        host.calls(),
        ["login registry.example.org", "build", "down", "up"]
    );
}

#[tokio::test]
async fn test_registry_without_password_fails_before_touching_stack() {
    let mut cfg = config();
    cfg.stack.registry = Some(RegistryConfig {
        server: "registry.example.org".to_string(),
        username: "deploy".to_string(),
    });
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(1);

    let err = install(
        &host,
        &host,
        &host,
        &app,
        &MemEnvStore::default(),
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        InstallOptions {
            skip_host_setup: true,
            ..opts(&cfg)
        },
    )
    .await
    .expect_err("missing registry password");

    assert!(format!("{err:#}").contains("SILEX_REGISTRY_PASSWORD"), "got: {err:#}");
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_failed_up_aborts_before_polling() {
    let cfg = config();
    let host = FakeHost {
        fail_on: Some("up"),
        ..FakeHost::default()
    };
    let app = FakeContainer::ready_on(1);

    let err = install(
        &host,
        &host,
        &host,
        &app,
        &MemEnvStore::default(),
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        InstallOptions {
            skip_host_setup: true,
            ..opts(&cfg)
        },
    )
    .await
    .expect_err("up failure");

    assert!(format!("{err:#}").contains("starting stack"), "got: {err:#}");
    assert_eq!(app.fetches.get(), 0);
    assert_eq!(app.creates.get(), 0);
}

#[tokio::test]
async fn test_invalid_admin_email_fails_fast() {
    let mut cfg = config();
    cfg.admin.email = "not-an-email".to_string();
    let host = FakeHost::default();
    let app = FakeContainer::ready_on(1);

    let result = install(
        &host,
        &host,
        &host,
        &app,
        &MemEnvStore::default(),
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        opts(&cfg),
    )
    .await;

    assert!(result.is_err());
    assert!(host.calls().is_empty());
}

#[tokio::test]
async fn test_user_creation_failure_is_reported_after_ready_stack() {
    let cfg = config();
    let host = FakeHost::default();
    let app = FakeContainer {
        fail_create: true,
        ..FakeContainer::ready_on(2)
    };

    let outcome = install(
        &host,
        &host,
        &host,
        &app,
        &MemEnvStore::default(),
        &TotalSleeper::default(),
        &CapturingReporter::default(),
        opts(&cfg),
    )
    .await
    .expect("a user failure is an outcome");

    match outcome {
        InstallOutcome::UserFailed { readiness, reason } => {
            assert_eq!(readiness.attempts(), 2);
            assert!(reason.contains("admin@opensilex.org"), "got: {reason}");
        }
        other => panic!("expected UserFailed, got {other:?}"),
    }
    assert_eq!(app.creates.get(), 1);
}
