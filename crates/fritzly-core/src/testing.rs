// Scripted `RouterRpc` for unit tests.
//
// Responses are queued per (service, action). The last queued response
// repeats, so a single scripted reply answers every call. Services with
// nothing scripted behave as absent from the device.

#![allow(clippy::unwrap_used)]

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;

use fritzly_api::{ActionResponse, Arguments, Error as ApiError};

use crate::rpc::RouterRpc;

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok(ActionResponse),
    Fault(u16),
    Unauthorized,
}

#[derive(Default)]
pub(crate) struct FakeRpc {
    services: Mutex<HashSet<String>>,
    replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, String, Arguments)>>,
}

impl FakeRpc {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queue a reply; consecutive calls consume replies in order.
    pub(crate) fn reply(self, service: &str, action: &str, reply: Reply) -> Self {
        self.services.lock().unwrap().insert(service.to_owned());
        self.replies
            .lock()
            .unwrap()
            .entry((service.to_owned(), action.to_owned()))
            .or_default()
            .push_back(reply);
        self
    }

    pub(crate) fn ok(self, service: &str, action: &str, fields: &[(&str, &str)]) -> Self {
        let response = fields
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        self.reply(service, action, Reply::Ok(response))
    }

    pub(crate) fn fault(self, service: &str, action: &str, code: u16) -> Self {
        self.reply(service, action, Reply::Fault(code))
    }

    /// How many times `service.action` was invoked.
    pub(crate) fn count(&self, service: &str, action: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, a, _)| s == service && a == action)
            .count()
    }

    /// Arguments of every `service.action` invocation, oldest first.
    pub(crate) fn args(&self, service: &str, action: &str) -> Vec<Arguments> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, a, _)| s == service && a == action)
            .map(|(_, _, args)| args.clone())
            .collect()
    }

    /// Service and action of every invocation, oldest first.
    pub(crate) fn log(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(s, a, _)| format!("{s}.{a}"))
            .collect()
    }

    fn next_reply(&self, service: &str, action: &str) -> Result<ActionResponse, ApiError> {
        if !self.services.lock().unwrap().contains(service) {
            return Err(ApiError::UnknownService {
                service: service.to_owned(),
            });
        }

        let mut replies = self.replies.lock().unwrap();
        let queue = replies
            .get_mut(&(service.to_owned(), action.to_owned()))
            .ok_or_else(|| ApiError::UnknownAction {
                service: service.to_owned(),
                action: action.to_owned(),
            })?;
        let reply = if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        };

        match reply {
            Reply::Ok(response) => Ok(response),
            Reply::Fault(code) => Err(ApiError::Fault {
                code,
                description: "scripted fault".into(),
            }),
            Reply::Unauthorized => Err(ApiError::Authorization {
                username: "dslf-config".into(),
            }),
        }
    }
}

impl RouterRpc for FakeRpc {
    async fn call(
        &self,
        service: &str,
        action: &str,
        args: Arguments,
    ) -> Result<ActionResponse, ApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((service.to_owned(), action.to_owned(), args));
        self.next_reply(service, action)
    }
}
