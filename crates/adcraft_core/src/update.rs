use adcraft_logging::{adcraft_debug, adcraft_info, adcraft_warn};

use crate::{
    Effect, FailureReason, GenerationSession, JobStatus, Msg, Outcome, PollEvent, SessionPhase,
    TickAction,
};

/// Pure update function: applies a message to the session and returns any effects.
pub fn update(mut session: GenerationSession, msg: Msg) -> (GenerationSession, Vec<Effect>) {
    if let Some(ticket) = msg.ticket() {
        if !session.is_current(ticket) {
            adcraft_debug!(
                "Discarding stale message from ticket {} (current {}): {:?}",
                ticket,
                session.ticket(),
                msg
            );
            return (session, Vec::new());
        }
    }

    let phase = session.phase();
    let effects = match msg {
        Msg::Submit(request) => {
            // A second submit while busy tears the previous job down first.
            let mut effects = Vec::new();
            if phase.is_busy() {
                adcraft_info!(
                    "Submit while {:?}; resetting session ticket {}",
                    phase,
                    session.ticket()
                );
                effects.push(Effect::Disarm);
            }
            session.reset();

            if let Err(err) = request.validate() {
                adcraft_warn!("Rejected generation request: {}", err);
                let outcome = Outcome::Failed(FailureReason::Submission(err.to_string()));
                session.finish(outcome.clone());
                effects.push(Effect::Terminal(outcome));
                return (session, effects);
            }

            adcraft_info!(
                "Submitting {} job for campaign {} via {}/{} (ticket {})",
                request.kind,
                request.campaign_id,
                request.provider,
                request.model,
                session.ticket()
            );
            let ticket = session.ticket();
            session.begin_submit(request.clone());
            effects.push(Effect::CreateJob { ticket, request });
            effects
        }
        Msg::Cancel => {
            if phase.is_busy() {
                adcraft_info!("Cancelling session ticket {}", session.ticket());
            }
            session.reset();
            session.mark_cancelled();
            if phase.is_busy() {
                vec![Effect::Disarm]
            } else {
                Vec::new()
            }
        }
        Msg::JobAccepted {
            ticket,
            job_id,
            accepted_at,
        } if phase == SessionPhase::Submitting => {
            adcraft_info!("Job {} accepted (ticket {})", job_id, ticket);
            session.activate(job_id, accepted_at);
            let config = session.config();
            vec![Effect::ArmTimers {
                ticket,
                poll_interval: config.poll_interval,
                narration_interval: config.narration_interval,
            }]
        }
        Msg::SubmitFailed { error, .. } if phase == SessionPhase::Submitting => {
            adcraft_warn!("Job submission failed: {}", error);
            let outcome = Outcome::Failed(FailureReason::Submission(error));
            session.finish(outcome.clone());
            vec![Effect::Terminal(outcome)]
        }
        Msg::PollTick { ticket } if phase == SessionPhase::Active => {
            let action = session
                .poller_mut()
                .map_or(TickAction::Wait, |poller| poller.on_tick());
            match action {
                TickAction::Fetch(job_id) => vec![Effect::FetchStatus { ticket, job_id }],
                TickAction::Wait => Vec::new(),
                TickAction::TimedOut { attempts } => {
                    adcraft_warn!("Polling timed out after {} attempts", attempts);
                    terminate(
                        &mut session,
                        Outcome::Failed(FailureReason::Timeout { attempts }),
                    )
                }
            }
        }
        Msg::StatusFetched { result, .. } if phase == SessionPhase::Active => {
            let event = session
                .poller_mut()
                .map_or(PollEvent::Ignored, |poller| poller.on_response(result));
            match event {
                PollEvent::InProgress(status) => {
                    let percent = session.estimator_mut().observe(status);
                    adcraft_debug!("Job still {}; progress {}%", status, percent);
                    vec![Effect::Progress {
                        percent,
                        message: session.current_message(),
                    }]
                }
                PollEvent::Completed(payload) => {
                    let percent = session.estimator_mut().observe(JobStatus::Completed);
                    let message = session.current_message();
                    adcraft_info!("Job completed (payload present: {})", payload.is_some());
                    let mut effects = vec![Effect::Progress { percent, message }];
                    effects.extend(terminate(&mut session, Outcome::Completed(payload)));
                    effects
                }
                PollEvent::Failed(reason) => {
                    adcraft_warn!("Job ended in failure: {}", reason);
                    terminate(&mut session, Outcome::Failed(reason))
                }
                PollEvent::TransientError { .. } => {
                    vec![Effect::Progress {
                        percent: session.progress().percent,
                        message: session.current_message(),
                    }]
                }
                PollEvent::Ignored => Vec::new(),
            }
        }
        Msg::NarrationTick { .. } if phase == SessionPhase::Active => {
            let message = session
                .narrator_mut()
                .advance()
                .unwrap_or_default()
                .to_string();
            vec![Effect::Progress {
                percent: session.progress().percent,
                message,
            }]
        }
        Msg::JobAccepted { .. }
        | Msg::SubmitFailed { .. }
        | Msg::PollTick { .. }
        | Msg::StatusFetched { .. }
        | Msg::NarrationTick { .. } => {
            adcraft_debug!("Ignoring message while {:?}", phase);
            Vec::new()
        }
    };

    (session, effects)
}

fn terminate(session: &mut GenerationSession, outcome: Outcome) -> Vec<Effect> {
    session.finish(outcome.clone());
    vec![Effect::Disarm, Effect::Terminal(outcome)]
}
