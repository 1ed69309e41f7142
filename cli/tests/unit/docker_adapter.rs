//! Unit tests for `DockerCli` argument construction and output handling.

use std::path::PathBuf;

use silex_deploy::application::ports::{ComposeStack, ContainerLogs, UserDirectory};
use silex_deploy::domain::config::StackConfig;
use silex_deploy::domain::readiness::DeploymentTarget;
use silex_deploy::domain::user::{Account, Identity};
use silex_deploy::infra::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use silex_deploy::infra::docker::DockerCli;

use crate::helpers::{LogBuf, MockCommandRunner, err_output, ok_output};

fn stack() -> StackConfig {
    StackConfig {
        project_dir: PathBuf::from("/srv/opensilex"),
        ..StackConfig::default()
    }
}

fn admin() -> Account {
    Account {
        identity: Identity::parse("admin@opensilex.org").expect("valid"),
        admin: true,
        lang: "fr".to_string(),
        first_name: "Admin".to_string(),
        last_name: "OpenSilex".to_string(),
        password: "admin".to_string(),
    }
}

#[tokio::test]
async fn test_up_runs_compose_detached_with_project_files() {
    let mock = MockCommandRunner::new_ok();
    let docker = DockerCli::new(mock.clone(), &stack());

    docker.up().await.expect("up should succeed");

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].program, "docker");
    assert_eq!(
        calls[0].args,
        [
            "compose",
            "--project-directory",
            "/srv/opensilex",
            "-f",
            "/srv/opensilex/docker-compose.yml",
            "--env-file",
            "/srv/opensilex/.env",
            "up",
            "-d",
        ]
    );
}

#[tokio::test]
async fn test_compose_failure_carries_stderr() {
    let mock = MockCommandRunner::responding(|_, _| Ok(err_output(1, b"no such service")));
    let docker = DockerCli::new(mock, &stack());

    let err = docker.down().await.expect_err("down should fail");

    assert!(format!("{err:#}").contains("no such service"), "got: {err:#}");
}

#[tokio::test]
async fn test_login_sends_password_on_stdin() {
    let mock = MockCommandRunner::new_ok();
    let docker = DockerCli::new(mock.clone(), &stack());

    docker
        .login("registry.example.org", "deploy", "t0ken")
        .await
        .expect("login should succeed");

    let call = &mock.calls()[0];
    assert_eq!(
        call.args,
        ["login", "registry.example.org", "--username", "deploy", "--password-stdin"]
    );
    assert!(!call.args.iter().any(|a| a.contains("t0ken")));
    assert_eq!(call.stdin.as_deref(), Some(b"t0ken".as_slice()));
}

#[tokio::test]
async fn test_fetch_log_tail_requests_tail_and_merges_streams() {
    let mock = MockCommandRunner::responding(|_, _| {
        let mut out = ok_output(b"line one\nline two\n");
        out.stderr = b"Server startup in [812] milliseconds\n".to_vec();
        Ok(out)
    });
    let docker = DockerCli::new(mock.clone(), &stack());
    let target = DeploymentTarget::new("opensilex-docker-opensilexapp");

    let lines = docker.fetch_log_tail(&target).await.expect("logs");

    assert_eq!(
        mock.calls()[0].args,
        ["logs", "--tail", "50", "opensilex-docker-opensilexapp"]
    );
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2], "Server startup in [812] milliseconds");
}

#[tokio::test]
async fn test_fetch_log_tail_missing_container_is_error() {
    let mock =
        MockCommandRunner::responding(|_, _| Ok(err_output(1, b"Error: No such container: app")));
    let docker = DockerCli::new(mock, &stack());

    let result = docker.fetch_log_tail(&DeploymentTarget::new("app")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_users_execs_admin_cli_and_parses_emails() {
    let mock = MockCommandRunner::responding(|_, _| {
        Ok(ok_output(
            b"admin@opensilex.org  Admin OpenSilex\nguest@opensilex.org  Guest User\n",
        ))
    });
    let docker = DockerCli::new(mock.clone(), &stack());

    let users = docker.list_users().await.expect("list");

    assert_eq!(
        mock.calls()[0].args,
        ["exec", "opensilex-docker-opensilexapp", "./bin/opensilex.sh", "user", "list"]
    );
    assert_eq!(users.len(), 2);
    assert!(users.contains(&Identity::parse("guest@opensilex.org").expect("valid")));
}

#[tokio::test]
async fn test_create_user_passes_full_flag_set() {
    let mock = MockCommandRunner::new_ok();
    let docker = DockerCli::new(mock.clone(), &stack());

    docker.create_user(&admin()).await.expect("create");

    assert_eq!(
        mock.calls()[0].args,
        [
            "exec",
            "opensilex-docker-opensilexapp",
            "./bin/opensilex.sh",
            "user",
            "add",
            "--admin",
            "--email=admin@opensilex.org",
            "--lang=fr",
            "--firstName=Admin",
            "--lastName=OpenSilex",
            "--password=admin",
        ]
    );
}

#[tokio::test]
async fn test_create_user_nonzero_exit_is_error_without_output() {
    let mock = MockCommandRunner::responding(|_, _| {
        Ok(err_output(2, b"java.lang.Exception: password=admin rejected"))
    });
    let docker = DockerCli::new(mock, &stack());

    let err = docker.create_user(&admin()).await.expect_err("should fail");
    let msg = err.to_string();

    assert!(msg.contains("exit code 2"), "got: {msg}");
    assert!(!msg.contains("password"), "command output must stay out of the error: {msg}");
}

#[tokio::test]
async fn test_create_user_debug_log_hides_password() {
    let logs = LogBuf::default();
    let _guard = logs.install();
    let mut account = admin();
    account.password = "TopS3cret".to_string();
    let docker = DockerCli::new(TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT), &stack());

    // Whether or not docker is installed, the spawn is logged first.
    let _ = docker.create_user(&account).await;

    let captured = logs.contents();
    assert!(captured.contains("spawning"), "got: {captured}");
    assert!(!captured.contains("TopS3cret"), "got: {captured}");
}

#[tokio::test]
async fn test_create_user_output_echoing_password_is_scrubbed() {
    let logs = LogBuf::default();
    let _guard = logs.install();
    let mock = MockCommandRunner::responding(|_, _| {
        Ok(ok_output(b"created admin@opensilex.org with password admin\n"))
    });
    let docker = DockerCli::new(mock, &stack());

    docker.create_user(&admin()).await.expect("create");

    let captured = logs.contents();
    assert!(captured.contains("user add finished"), "got: {captured}");
    assert!(!captured.contains("password admin"), "got: {captured}");
}
