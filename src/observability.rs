use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("rillabot.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("rillabot.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("rillabot.client.request_duration_seconds");

pub(crate) static CREDENTIAL_VALIDATIONS: Counter =
    Counter::new("rillabot.credential.validations");
pub(crate) static CREDENTIAL_REJECTIONS: Counter = Counter::new("rillabot.credential.rejections");
pub(crate) static CREDENTIAL_PROMPTS: Counter = Counter::new("rillabot.credential.prompts");

pub(crate) static SESSION_TURNS: Counter = Counter::new("rillabot.session.turns");
pub(crate) static SESSION_TURN_ERRORS: Counter = Counter::new("rillabot.session.turn_errors");
pub(crate) static SESSION_TOKENS: Counter = Counter::new("rillabot.session.tokens");
pub(crate) static SESSION_MEMORY_CLEARS: Counter = Counter::new("rillabot.session.memory_clears");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&CREDENTIAL_VALIDATIONS);
    collector.register_counter(&CREDENTIAL_REJECTIONS);
    collector.register_counter(&CREDENTIAL_PROMPTS);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_TURN_ERRORS);
    collector.register_counter(&SESSION_TOKENS);
    collector.register_counter(&SESSION_MEMORY_CLEARS);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registers_every_metric() {
        register_biometrics(Collector::new());
    }
}
