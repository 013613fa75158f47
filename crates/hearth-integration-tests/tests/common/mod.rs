//! Shared doubles for approval-flow integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use hearth_approval::{
    ApprovalChannel, ApprovalRequest, ChannelDecision, ChannelError, CriticalResources, RequestId,
};
use hearth_core::{
    ActionArgs, ActionError, ActionResult, RemediationAction, ResourceCategory,
};

/// Channel scripted with a single standing decision.
///
/// `None` stays silent forever, which drives the timeout path. Prompts
/// and notices are recorded for assertions.
#[allow(dead_code)]
pub struct ScriptedChannel {
    decision: Option<ChannelDecision>,
    pub prompts: Mutex<Vec<ApprovalRequest>>,
    pub notices: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedChannel {
    pub fn approving() -> Self {
        Self::with_decision(Some(ChannelDecision::Approved))
    }

    pub fn rejecting() -> Self {
        Self::with_decision(Some(ChannelDecision::Rejected))
    }

    pub fn silent() -> Self {
        Self::with_decision(None)
    }

    fn with_decision(decision: Option<ChannelDecision>) -> Self {
        Self {
            decision,
            prompts: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn notice_count(&self) -> usize {
        self.notices.lock().unwrap().len()
    }
}

#[async_trait]
impl ApprovalChannel for ScriptedChannel {
    async fn send_prompt(
        &self,
        request: &ApprovalRequest,
        _timeout: Duration,
    ) -> Result<(), ChannelError> {
        self.prompts.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn poll_decision(&self, _id: &RequestId) -> Result<Option<ChannelDecision>, ChannelError> {
        Ok(self.decision)
    }

    async fn send_notice(&self, text: &str) {
        self.notices.lock().unwrap().push(text.to_string());
    }
}

/// Action that records how often it ran.
#[allow(dead_code)]
pub struct CountingAction {
    name: &'static str,
    runs: AtomicUsize,
}

#[allow(dead_code)]
impl CountingAction {
    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            runs: AtomicUsize::new(0),
        }
    }

    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemediationAction for CountingAction {
    fn name(&self) -> &str {
        self.name
    }

    async fn execute(&self, args: &ActionArgs) -> ActionResult<String> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        if args.dry_run() {
            Ok(format!("would run {}", self.name))
        } else {
            Ok(format!("{} done", self.name))
        }
    }
}

/// Action that always fails against its upstream API.
#[allow(dead_code)]
pub struct FailingAction;

#[async_trait]
impl RemediationAction for FailingAction {
    fn name(&self) -> &str {
        "restart_lxc"
    }

    async fn execute(&self, _args: &ActionArgs) -> ActionResult<String> {
        Err(ActionError::Api {
            service: "proxmox".to_string(),
            message: "lock timeout".to_string(),
        })
    }
}

/// Registry resembling a small homelab: two protected containers, one
/// protected name, and the NAS VM as the highest-sensitivity resource.
#[allow(dead_code)]
pub fn lab_registry() -> CriticalResources {
    let mut registry = CriticalResources::new();
    registry.insert(ResourceCategory::Lxc, 200_u64);
    registry.insert(ResourceCategory::Lxc, 250_u64);
    registry.insert(ResourceCategory::Docker, "traefik");
    registry.set_highest_risk(ResourceCategory::Vm, 100_u64);
    registry
}
