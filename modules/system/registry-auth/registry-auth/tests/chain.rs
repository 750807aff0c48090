#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Integration tests for the provider chain behind the service.
//!
//! Providers are fakes that record every call, so the tests can check both
//! the verdict and which providers were consulted.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use registry_auth::config::{PackageRule, UserEntry};
use registry_auth::domain::builtin::static_users::sha1_hex;
use registry_auth::{RegistryAuthConfig, Service};
use registry_auth_sdk::{
    AuthProvider, Capabilities, Capability, PackageAccess, Principal, RegistryAuthClient,
    RegistryAuthError,
};
use secrecy::SecretString;

type CallLog = Arc<Mutex<Vec<String>>>;

/// Scripted provider answering every operation with a fixed outcome.
struct FakeProvider {
    name: &'static str,
    capabilities: Capabilities,
    groups: Result<Option<Vec<String>>, RegistryAuthError>,
    created: Result<bool, RegistryAuthError>,
    allowed: Result<bool, RegistryAuthError>,
    calls: CallLog,
}

impl FakeProvider {
    fn new(name: &'static str, calls: &CallLog) -> Self {
        Self {
            name,
            capabilities: Capabilities::NONE,
            groups: Ok(None),
            created: Ok(false),
            allowed: Ok(false),
            calls: Arc::clone(calls),
        }
    }

    fn authenticates(mut self, groups: Result<Option<Vec<String>>, RegistryAuthError>) -> Self {
        self.capabilities = self.capabilities.with(Capability::Authenticate);
        self.groups = groups;
        self
    }

    fn registers(mut self, created: Result<bool, RegistryAuthError>) -> Self {
        self.capabilities = self.capabilities.with(Capability::AddUser);
        self.created = created;
        self
    }

    fn allows(mut self, allowed: Result<bool, RegistryAuthError>) -> Self {
        self.capabilities = self
            .capabilities
            .with(Capability::AllowAccess)
            .with(Capability::AllowPublish);
        self.allowed = allowed;
        self
    }

    fn record(&self, operation: &str) {
        self.calls.lock().push(format!("{}.{operation}", self.name));
    }
}

#[async_trait]
impl AuthProvider for FakeProvider {
    fn name(&self) -> &str {
        self.name
    }

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    async fn authenticate(
        &self,
        _user: &str,
        _password: &str,
    ) -> Result<Option<Vec<String>>, RegistryAuthError> {
        self.record("authenticate");
        self.groups.clone()
    }

    async fn add_user(&self, _user: &str, _password: &str) -> Result<bool, RegistryAuthError> {
        self.record("add_user");
        self.created.clone()
    }

    async fn allow_access(
        &self,
        _principal: &Principal,
        _package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        self.record("allow_access");
        self.allowed.clone()
    }

    async fn allow_publish(
        &self,
        _principal: &Principal,
        _package: &PackageAccess,
    ) -> Result<bool, RegistryAuthError> {
        self.record("allow_publish");
        self.allowed.clone()
    }
}

fn config() -> RegistryAuthConfig {
    RegistryAuthConfig {
        secret: Some(SecretString::from("chain-secret".to_owned())),
        ..RegistryAuthConfig::default()
    }
}

fn service(
    cfg: &RegistryAuthConfig,
    providers: Vec<FakeProvider>,
) -> Arc<dyn RegistryAuthClient> {
    let providers = providers
        .into_iter()
        .map(|p| Arc::new(p) as Arc<dyn AuthProvider>)
        .collect();
    Arc::new(Service::from_config(cfg, providers).unwrap())
}

fn calls(log: &CallLog) -> Vec<String> {
    log.lock().clone()
}

#[tokio::test]
async fn first_affirmative_provider_wins() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![
            FakeProvider::new("first", &log).authenticates(Ok(None)),
            FakeProvider::new("second", &log).authenticates(Ok(Some(vec!["dev".to_owned()]))),
            FakeProvider::new("third", &log).authenticates(Ok(Some(vec!["ops".to_owned()]))),
        ],
    );

    let principal = svc.authenticate("carol", "pw").await.unwrap();

    assert_eq!(principal.name(), Some("carol"));
    assert_eq!(principal.real_groups(), &["dev"]);
    assert_eq!(calls(&log), ["first.authenticate", "second.authenticate"]);
}

#[tokio::test]
async fn provider_error_stops_the_chain_unchanged() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![
            FakeProvider::new("ldap", &log)
                .authenticates(Err(RegistryAuthError::forbidden("account locked"))),
            FakeProvider::new("never", &log).authenticates(Ok(Some(vec!["dev".to_owned()]))),
        ],
    );

    let err = svc.authenticate("carol", "pw").await.unwrap_err();

    assert_eq!(err, RegistryAuthError::forbidden("account locked"));
    assert_eq!(calls(&log), ["ldap.authenticate"]);
}

#[tokio::test]
async fn empty_group_list_is_no_verdict() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![FakeProvider::new("empty", &log).authenticates(Ok(Some(Vec::new())))],
    );

    let err = svc.authenticate("carol", "pw").await.unwrap_err();

    assert_eq!(
        err,
        RegistryAuthError::forbidden("bad username/password, access denied")
    );
    assert_eq!(calls(&log), ["empty.authenticate"]);
}

#[tokio::test]
async fn providers_without_the_capability_are_not_called() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![
            FakeProvider::new("acl-only", &log).allows(Ok(false)),
            FakeProvider::new("auth", &log).authenticates(Ok(Some(vec!["dev".to_owned()]))),
        ],
    );

    svc.authenticate("carol", "pw").await.unwrap();

    assert_eq!(calls(&log), ["auth.authenticate"]);
}

#[tokio::test]
async fn static_users_answer_before_providers() {
    let log = CallLog::default();
    let mut cfg = config();
    cfg.users.insert(
        "alice".to_owned(),
        UserEntry {
            password: sha1_hex("wonderland"),
        },
    );
    let svc = service(
        &cfg,
        vec![FakeProvider::new("plugin", &log).authenticates(Ok(Some(vec!["x".to_owned()])))],
    );

    let principal = svc.authenticate("alice", "wonderland").await.unwrap();

    assert_eq!(principal.real_groups(), &["alice"]);
    assert!(calls(&log).is_empty());
}

#[tokio::test]
async fn add_user_then_authenticates() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![
            FakeProvider::new("htpasswd", &log)
                .registers(Ok(true))
                .authenticates(Ok(Some(vec!["newbie".to_owned()]))),
        ],
    );

    let principal = svc.add_user("newbie", "pw").await.unwrap();

    assert_eq!(principal.name(), Some("newbie"));
    assert_eq!(calls(&log), ["htpasswd.add_user", "htpasswd.authenticate"]);
}

#[tokio::test]
async fn add_user_without_registering_provider_conflicts() {
    let log = CallLog::default();
    let svc = service(
        &config(),
        vec![FakeProvider::new("declines", &log).registers(Ok(false))],
    );

    let err = svc.add_user("newbie", "pw").await.unwrap_err();

    assert_eq!(err, RegistryAuthError::conflict("registration is disabled"));
    assert_eq!(calls(&log), ["declines.add_user"]);
}

#[tokio::test]
async fn add_user_for_listed_user_conflicts() {
    let mut cfg = config();
    cfg.users.insert(
        "alice".to_owned(),
        UserEntry {
            password: sha1_hex("pw"),
        },
    );
    let svc = service(&cfg, Vec::new());

    let err = svc.add_user("alice", "other").await.unwrap_err();

    assert_eq!(err, RegistryAuthError::conflict("this user already exists"));
}

#[tokio::test]
async fn package_acl_decides_when_providers_abstain() {
    let mut cfg = config();
    cfg.packages = vec![PackageRule {
        pattern: "pkg*".to_owned(),
        access: vec!["$all".to_owned()],
        publish: vec!["dev".to_owned()],
    }];
    let svc = service(&cfg, Vec::new());
    let anonymous = Principal::anonymous();
    let dev = Principal::authenticated("carol", vec!["dev".to_owned()]);
    let alice = Principal::authenticated("alice", Vec::new());

    assert!(svc.allow_access("pkgX", &anonymous).await.unwrap());
    assert!(svc.allow_publish("pkgX", &dev).await.unwrap());
    assert_eq!(
        svc.allow_publish("pkgX", &alice).await.unwrap_err(),
        RegistryAuthError::forbidden("user alice is not allowed to publish package pkgX")
    );
    assert_eq!(
        svc.allow_publish("pkgX", &anonymous).await.unwrap_err(),
        RegistryAuthError::forbidden("unregistered users are not allowed to publish package pkgX")
    );
}

#[tokio::test]
async fn unmatched_package_has_empty_acls() {
    let mut cfg = config();
    cfg.packages = vec![PackageRule {
        pattern: "@scope/*".to_owned(),
        access: vec!["$all".to_owned()],
        publish: vec!["$all".to_owned()],
    }];
    let svc = service(&cfg, Vec::new());

    let err = svc
        .allow_access("lodash", &Principal::anonymous())
        .await
        .unwrap_err();

    assert_eq!(
        err,
        RegistryAuthError::forbidden("unregistered users are not allowed to access package lodash")
    );
}

#[tokio::test]
async fn provider_grant_overrides_package_acl() {
    let log = CallLog::default();
    let mut cfg = config();
    cfg.packages = Vec::new();
    let svc = service(&cfg, vec![FakeProvider::new("grants", &log).allows(Ok(true))]);

    assert!(
        svc.allow_publish("anything", &Principal::anonymous())
            .await
            .unwrap()
    );
    assert_eq!(calls(&log), ["grants.allow_publish"]);
}

#[tokio::test]
async fn issued_token_carries_resolved_groups() {
    let mut cfg = config();
    cfg.users = HashMap::from([(
        "alice".to_owned(),
        UserEntry {
            password: sha1_hex("pw"),
        },
    )]);
    let client = service(&cfg, Vec::new());

    let principal = client.authenticate("alice", "pw").await.unwrap();
    let token = client.issue_token(&principal).unwrap();
    let payload = client.decode_token(&token).unwrap();

    assert_eq!(payload.u, "alice");
    assert_eq!(payload.groups(), &["alice"]);
    assert!(client.allow_access("lodash", &principal).await.unwrap());
}
