//! Orchestration run loop
//!
//! Drives one multi-turn interaction: start a generation, recover plain
//! text and tool calls from the stream, dispatch every call detected in
//! the segment, feed the results back into the conversation, and repeat
//! until the model produces a final answer — or a limit fires.
//!
//! Liveness is structural: every wait (stream read, tool dispatch,
//! cancellation grace) carries a bounded timeout, and each timeout maps
//! to a terminal or recoverable transition. A stalled model stream or a
//! hung provider can slow a run down, never freeze it.
//!
//! ```text
//! Idle ──> Generating ──> Completed
//!              │  ▲
//!              ▼  │          (turn/time limit ──> Failed,
//!          AwaitingTools      cancel ──> Cancelled, from any phase)
//! ```

pub mod limits;
pub mod types;

pub use limits::RunLimits;
pub use types::{RunError, RunInput, RunOutput, RunPhase};

use std::pin::pin;
use std::sync::Arc;
use std::time::Instant;

use courier_domain::core::truncate_content;
use courier_domain::{
    Conversation, Fragment, StreamEvent, ToolCall, ToolCallExtractor, ToolDefinition, ToolResult,
    TurnEntry,
};
use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_gateway::ModelGateway;
use crate::ports::run_observer::{NoObserver, RunObserver};
use crate::ports::tool_dispatch::ToolDispatchPort;

/// One generation segment's recovered output.
struct Segment {
    text: String,
    calls: Vec<ToolCall>,
}

/// The orchestrator for tool-augmented runs.
///
/// Holds its collaborators behind ports so a run can be driven entirely
/// by injected deterministic streams in tests. The conversation history
/// is created inside [`run`](Self::run) and owned by that call alone —
/// concurrent runs never share state.
pub struct Orchestrator<G: ModelGateway, D: ToolDispatchPort> {
    gateway: Arc<G>,
    dispatcher: Arc<D>,
    limits: RunLimits,
    cancellation: CancellationToken,
    observer: Arc<dyn RunObserver>,
    logger: Arc<dyn ConversationLogger>,
}

impl<G: ModelGateway, D: ToolDispatchPort> Orchestrator<G, D> {
    pub fn new(gateway: Arc<G>, dispatcher: Arc<D>) -> Self {
        Self {
            gateway,
            dispatcher,
            limits: RunLimits::default(),
            cancellation: CancellationToken::new(),
            observer: Arc::new(NoObserver),
            logger: Arc::new(NoConversationLogger),
        }
    }

    pub fn with_limits(mut self, limits: RunLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the cancellation token for this run.
    ///
    /// The caller keeps a clone of the token as the run's cancel handle;
    /// firing it is honored at every suspension point.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn RunObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Execute one run to a terminal state.
    pub async fn run(&self, input: RunInput) -> Result<RunOutput, RunError> {
        let result = self.drive(input).await;
        let phase = match &result {
            Ok(_) => RunPhase::Completed,
            Err(error) => error.terminal_phase(),
        };
        if phase != RunPhase::Completed {
            self.observer.on_phase_change(phase);
        }
        self.observer.on_finished(phase);
        self.logger.log(ConversationEvent::new(
            "run_finished",
            serde_json::json!({ "phase": phase.as_str() }),
        ));
        result
    }

    async fn drive(&self, input: RunInput) -> Result<RunOutput, RunError> {
        if self.cancellation.is_cancelled() {
            return Err(RunError::Cancelled);
        }

        let started = Instant::now();
        info!(request = %input.request, "Starting run");

        let mut conversation = match &input.system_prompt {
            Some(prompt) => Conversation::with_system_prompt(prompt.clone()),
            None => Conversation::new(),
        };
        conversation.append(TurnEntry::user(input.request.clone()));
        self.logger.log(ConversationEvent::new(
            "user_input",
            serde_json::json!({ "content": input.request }),
        ));

        let catalog = self.dispatcher.catalog();
        let mut extractor = ToolCallExtractor::new();
        let mut answer = String::new();
        let mut thinking = Vec::new();
        let mut tool_results: Vec<ToolResult> = Vec::new();
        let mut turns = 0usize;

        loop {
            self.check_time_budget(started)?;

            self.observer.on_phase_change(RunPhase::Generating);
            let segment = self
                .generate_segment(
                    &conversation,
                    &catalog,
                    &mut extractor,
                    &mut answer,
                    &mut thinking,
                )
                .await?;

            if !segment.text.is_empty() {
                self.logger.log(ConversationEvent::new(
                    "assistant_text",
                    serde_json::json!({ "content": segment.text }),
                ));
                conversation.append(TurnEntry::assistant(segment.text.clone()));
            }

            if segment.calls.is_empty() {
                // Final answer: the segment ended with nothing pending.
                info!(turns, "Run completed");
                self.observer.on_phase_change(RunPhase::Completed);
                return Ok(RunOutput {
                    answer,
                    thinking,
                    conversation,
                    turns,
                    tool_results,
                });
            }

            self.observer.on_phase_change(RunPhase::AwaitingTools);
            turns += 1;
            debug!(
                turn = turns,
                calls = segment.calls.len(),
                "Dispatching segment tool calls"
            );

            let results = self.dispatch_segment(&segment.calls).await?;
            for result in results {
                let rendered = truncate_content(&result.render(), self.limits.max_tool_result_len);
                conversation.append(TurnEntry::tool(format!(
                    "[{}] {}",
                    result.tool_name, rendered
                )));
                self.logger.log(ConversationEvent::new(
                    "tool_result",
                    serde_json::json!({
                        "callId": result.call_id.as_str(),
                        "tool": result.tool_name,
                        "success": result.success,
                    }),
                ));
                self.observer.on_tool_completed(&result);
                tool_results.push(result);
            }

            if turns >= self.limits.max_turns {
                warn!(turns, "Turn limit exceeded");
                return Err(RunError::TurnLimitExceeded { turns });
            }

            extractor.reset();
        }
    }

    fn check_time_budget(&self, started: Instant) -> Result<(), RunError> {
        let elapsed = started.elapsed();
        if elapsed >= self.limits.time_budget {
            let elapsed_ms = elapsed.as_millis() as u64;
            warn!(elapsed_ms, "Time budget exceeded");
            return Err(RunError::TimeBudgetExceeded { elapsed_ms });
        }
        Ok(())
    }

    /// Run one generation segment to its end, routing every recovered
    /// fragment. Each stream read is bounded by `stream_read_timeout`.
    async fn generate_segment(
        &self,
        conversation: &Conversation,
        catalog: &[ToolDefinition],
        extractor: &mut ToolCallExtractor,
        answer: &mut String,
        thinking: &mut Vec<String>,
    ) -> Result<Segment, RunError> {
        let mut stream = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => return Err(RunError::Cancelled),
            started = tokio::time::timeout(
                self.limits.stream_read_timeout,
                self.gateway.start_stream(conversation, catalog),
            ) => match started {
                Ok(stream) => stream?,
                Err(_) => {
                    warn!("Gateway did not start a stream within the read timeout");
                    return Err(RunError::StreamStalled);
                }
            }
        };
        let mut segment = Segment {
            text: String::new(),
            calls: Vec::new(),
        };

        loop {
            let event = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => {
                    stream.cancel();
                    return Err(RunError::Cancelled);
                }
                read = tokio::time::timeout(
                    self.limits.stream_read_timeout,
                    stream.next_event(),
                ) => {
                    match read {
                        Ok(event) => event,
                        Err(_) => {
                            warn!("No chunk within the stream read timeout");
                            stream.cancel();
                            return Err(RunError::StreamStalled);
                        }
                    }
                }
            };

            match event {
                Some(StreamEvent::Delta(chunk)) => {
                    for fragment in extractor.consume(&chunk) {
                        self.absorb(fragment, &mut segment, answer, thinking);
                    }
                }
                Some(StreamEvent::Error(message)) => {
                    stream.cancel();
                    return Err(RunError::StreamFailed(message));
                }
                Some(StreamEvent::Completed) | None => {
                    for fragment in extractor.finish() {
                        self.absorb(fragment, &mut segment, answer, thinking);
                    }
                    return Ok(segment);
                }
            }
        }
    }

    fn absorb(
        &self,
        fragment: Fragment,
        segment: &mut Segment,
        answer: &mut String,
        thinking: &mut Vec<String>,
    ) {
        match fragment {
            Fragment::PlainText(text) => {
                self.observer.on_text(&text);
                answer.push_str(&text);
                segment.text.push_str(&text);
            }
            Fragment::Thinking(text) => {
                self.observer.on_thinking(&text);
                self.logger.log(ConversationEvent::new(
                    "thinking",
                    serde_json::json!({ "content": text }),
                ));
                thinking.push(text);
            }
            Fragment::ToolCall(call) => {
                debug!(tool = %call.name, id = %call.id, "Tool call detected");
                self.observer.on_tool_invoked(&call);
                self.logger.log(ConversationEvent::new(
                    "tool_call",
                    serde_json::json!({
                        "id": call.id.as_str(),
                        "name": call.name,
                        "arguments": call.raw_arguments,
                    }),
                ));
                segment.calls.push(call);
            }
        }
    }

    /// Dispatch all calls of a segment concurrently and join the results
    /// in detection order. The turn does not advance until every call
    /// has resolved.
    async fn dispatch_segment(&self, calls: &[ToolCall]) -> Result<Vec<ToolResult>, RunError> {
        let invocations = calls.iter().map(|call| {
            let dispatcher = Arc::clone(&self.dispatcher);
            let timeout = self.limits.tool_timeout;
            let cancel = self.cancellation.child_token();
            async move { dispatcher.invoke(call, timeout, cancel).await }
        });
        let mut joined = pin!(join_all(invocations));

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                // In-flight calls saw their child token fire; wait out the
                // grace period, then discard whatever is still running.
                let _ = tokio::time::timeout(self.limits.cancel_grace, &mut joined).await;
                Err(RunError::Cancelled)
            }
            results = &mut joined => Ok(results),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_domain::{InvocationError, InvocationErrorKind, Role};
    use crate::ports::model_gateway::{GatewayError, ModelStream};
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Gateway that streams scripted segment texts in small chunks.
    struct ScriptedGateway {
        segments: StdMutex<VecDeque<String>>,
        /// Used when the script runs out, e.g. a model that never stops
        /// calling tools.
        fallback: Option<String>,
    }

    impl ScriptedGateway {
        fn new(segments: &[&str]) -> Self {
            Self {
                segments: StdMutex::new(segments.iter().map(|s| s.to_string()).collect()),
                fallback: None,
            }
        }

        fn looping(segment: &str) -> Self {
            Self {
                segments: StdMutex::new(VecDeque::new()),
                fallback: Some(segment.to_string()),
            }
        }
    }

    #[async_trait]
    impl ModelGateway for ScriptedGateway {
        async fn start_stream(
            &self,
            _conversation: &Conversation,
            _tools: &[ToolDefinition],
        ) -> Result<ModelStream, GatewayError> {
            let text = self
                .segments
                .lock()
                .unwrap()
                .pop_front()
                .or_else(|| self.fallback.clone())
                .unwrap_or_default();

            let (tx, rx) = mpsc::channel(64);
            tokio::spawn(async move {
                for chunk in chunks_of(&text, 7) {
                    if tx.send(StreamEvent::Delta(chunk)).await.is_err() {
                        return;
                    }
                }
                let _ = tx.send(StreamEvent::Completed).await;
            });
            Ok(ModelStream::new(rx, CancellationToken::new()))
        }
    }

    /// Gateway whose stream produces nothing, forever.
    struct SilentGateway;

    #[async_trait]
    impl ModelGateway for SilentGateway {
        async fn start_stream(
            &self,
            _conversation: &Conversation,
            _tools: &[ToolDefinition],
        ) -> Result<ModelStream, GatewayError> {
            let (tx, rx) = mpsc::channel(1);
            tokio::spawn(async move {
                // Keep the sender alive so the channel never closes.
                tokio::time::sleep(Duration::from_secs(3600)).await;
                drop(tx);
            });
            Ok(ModelStream::new(rx, CancellationToken::new()))
        }
    }

    /// Gateway that fails mid-stream.
    struct FailingGateway;

    #[async_trait]
    impl ModelGateway for FailingGateway {
        async fn start_stream(
            &self,
            _conversation: &Conversation,
            _tools: &[ToolDefinition],
        ) -> Result<ModelStream, GatewayError> {
            let (tx, rx) = mpsc::channel(4);
            tokio::spawn(async move {
                let _ = tx.send(StreamEvent::Delta("partial".into())).await;
                let _ = tx.send(StreamEvent::Error("runtime fault".into())).await;
            });
            Ok(ModelStream::new(rx, CancellationToken::new()))
        }
    }

    /// Dispatcher that records invocation order and can delay per tool.
    struct RecordingDispatcher {
        known: Vec<ToolDefinition>,
        delays: Vec<(String, Duration)>,
        invocations: StdMutex<Vec<String>>,
    }

    impl RecordingDispatcher {
        fn new(tools: &[&str]) -> Self {
            Self {
                known: tools
                    .iter()
                    .map(|name| ToolDefinition::new(*name, "test tool"))
                    .collect(),
                delays: Vec::new(),
                invocations: StdMutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, tool: &str, delay: Duration) -> Self {
            self.delays.push((tool.to_string(), delay));
            self
        }

        fn invoked(&self) -> Vec<String> {
            self.invocations.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ToolDispatchPort for RecordingDispatcher {
        fn catalog(&self) -> Vec<ToolDefinition> {
            self.known.clone()
        }

        async fn invoke(
            &self,
            call: &ToolCall,
            _timeout: Duration,
            _cancel: CancellationToken,
        ) -> ToolResult {
            self.invocations.lock().unwrap().push(call.name.clone());
            if let Some((_, delay)) = self.delays.iter().find(|(name, _)| *name == call.name) {
                tokio::time::sleep(*delay).await;
            }
            if self.known.iter().any(|t| t.name == call.name) {
                ToolResult::ok(call.id.clone(), &call.name, format!("{} ok", call.name))
            } else {
                ToolResult::fail(
                    call.id.clone(),
                    &call.name,
                    InvocationError::unknown_tool(&call.name),
                )
            }
        }
    }

    fn chunks_of(text: &str, size: usize) -> Vec<String> {
        let mut out = Vec::new();
        let mut current = String::new();
        for c in text.chars() {
            current.push(c);
            if current.len() >= size {
                out.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            out.push(current);
        }
        out
    }

    fn call_span(name: &str) -> String {
        format!(
            "<tool_call>{{\"name\": \"{}\", \"arguments\": {{}}}}</tool_call>",
            name
        )
    }

    #[tokio::test]
    async fn completes_without_tool_calls() {
        let gateway = Arc::new(ScriptedGateway::new(&["Hello there."]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let orchestrator = Orchestrator::new(gateway, dispatcher.clone());

        let output = orchestrator.run(RunInput::new("hi")).await.unwrap();
        assert_eq!(output.answer, "Hello there.");
        assert_eq!(output.turns, 0);
        assert!(output.tool_results.is_empty());
        assert!(dispatcher.invoked().is_empty());

        let roles: Vec<Role> = output.conversation.iter().map(|e| e.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);
    }

    #[tokio::test]
    async fn calendar_scenario_runs_to_completion() {
        let first = format!("Let me check. {}", call_span("listEvents"));
        let gateway = Arc::new(ScriptedGateway::new(&[&first, "You have 2 events."]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&["listEvents"]));
        let orchestrator = Orchestrator::new(gateway, dispatcher.clone());

        let output = orchestrator
            .run(RunInput::new("what's on my calendar?"))
            .await
            .unwrap();

        assert_eq!(output.answer, "Let me check. You have 2 events.");
        assert_eq!(output.turns, 1);
        assert_eq!(output.tool_results.len(), 1);
        assert!(output.tool_results[0].is_ok());
        assert_eq!(dispatcher.invoked(), vec!["listEvents"]);

        // generation order: user, assistant text, tool result, final text
        let entries = output.conversation.entries();
        assert_eq!(entries[0].role, Role::User);
        assert_eq!(entries[1].role, Role::Assistant);
        assert_eq!(entries[1].content, "Let me check. ");
        assert_eq!(entries[2].role, Role::Tool);
        assert!(entries[2].content.contains("listEvents ok"));
        assert_eq!(entries[3].content, "You have 2 events.");
    }

    #[tokio::test]
    async fn unknown_tool_does_not_fail_the_run() {
        let first = call_span("unknownTool");
        let gateway = Arc::new(ScriptedGateway::new(&[&first, "Sorry, I can't do that."]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&["listEvents"]));
        let orchestrator = Orchestrator::new(gateway, dispatcher);

        let output = orchestrator.run(RunInput::new("do the thing")).await.unwrap();
        assert_eq!(output.tool_results.len(), 1);
        assert_eq!(
            output.tool_results[0].error_kind(),
            Some(InvocationErrorKind::UnknownTool)
        );
        assert_eq!(output.answer, "Sorry, I can't do that.");
    }

    #[tokio::test]
    async fn turn_limit_terminates_a_looping_model() {
        let segment = call_span("listEvents");
        let gateway = Arc::new(ScriptedGateway::looping(&segment));
        let dispatcher = Arc::new(RecordingDispatcher::new(&["listEvents"]));
        let orchestrator = Orchestrator::new(gateway, dispatcher.clone())
            .with_limits(RunLimits::default().with_max_turns(3));

        let error = orchestrator.run(RunInput::new("loop")).await.unwrap_err();
        assert!(matches!(error, RunError::TurnLimitExceeded { turns: 3 }));
        // exactly N turns of tool dispatch, then termination
        assert_eq!(dispatcher.invoked().len(), 3);
    }

    #[tokio::test]
    async fn time_budget_terminates_a_looping_model() {
        let segment = call_span("listEvents");
        let gateway = Arc::new(ScriptedGateway::looping(&segment));
        let dispatcher = Arc::new(
            RecordingDispatcher::new(&["listEvents"])
                .with_delay("listEvents", Duration::from_millis(30)),
        );
        let orchestrator = Orchestrator::new(gateway, dispatcher).with_limits(
            RunLimits::default()
                .with_max_turns(1000)
                .with_time_budget(Duration::from_millis(80)),
        );

        let error = orchestrator.run(RunInput::new("loop")).await.unwrap_err();
        assert!(matches!(error, RunError::TimeBudgetExceeded { .. }));
    }

    #[tokio::test]
    async fn stalled_stream_fails_instead_of_hanging() {
        let gateway = Arc::new(SilentGateway);
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let orchestrator = Orchestrator::new(gateway, dispatcher).with_limits(
            RunLimits::default().with_stream_read_timeout(Duration::from_millis(50)),
        );

        let error = orchestrator.run(RunInput::new("hi")).await.unwrap_err();
        assert!(matches!(error, RunError::StreamStalled));
    }

    #[tokio::test]
    async fn stream_error_fails_the_run() {
        let gateway = Arc::new(FailingGateway);
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let orchestrator = Orchestrator::new(gateway, dispatcher);

        let error = orchestrator.run(RunInput::new("hi")).await.unwrap_err();
        assert!(matches!(error, RunError::StreamFailed(_)));
    }

    #[tokio::test]
    async fn cancellation_mid_generation_is_honored() {
        let gateway = Arc::new(SilentGateway);
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let token = CancellationToken::new();
        let orchestrator =
            Orchestrator::new(gateway, dispatcher).with_cancellation(token.clone());

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(30)).await;
            canceller.cancel();
        });

        let error = orchestrator.run(RunInput::new("hi")).await.unwrap_err();
        assert!(error.is_cancelled());
    }

    #[tokio::test]
    async fn cancellation_mid_dispatch_returns_after_grace() {
        let first = call_span("slow_tool");
        let gateway = Arc::new(ScriptedGateway::new(&[&first, "done"]));
        let dispatcher = Arc::new(
            RecordingDispatcher::new(&["slow_tool"])
                .with_delay("slow_tool", Duration::from_secs(30)),
        );
        let token = CancellationToken::new();
        let orchestrator = Orchestrator::new(gateway, dispatcher)
            .with_cancellation(token.clone())
            .with_limits(RunLimits::default().with_cancel_grace(Duration::from_millis(50)));

        let canceller = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(40)).await;
            canceller.cancel();
        });

        let started = std::time::Instant::now();
        let error = orchestrator.run(RunInput::new("hi")).await.unwrap_err();
        assert!(error.is_cancelled());
        // cancel fired at ~40ms, grace is 50ms: no waiting out the slow tool
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn pre_cancelled_run_returns_immediately() {
        let gateway = Arc::new(ScriptedGateway::new(&["never streamed"]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let token = CancellationToken::new();
        token.cancel();
        let orchestrator = Orchestrator::new(gateway, dispatcher).with_cancellation(token);

        let error = orchestrator.run(RunInput::new("hi")).await.unwrap_err();
        assert!(error.is_cancelled());
    }

    #[tokio::test]
    async fn results_append_in_detection_order_not_completion_order() {
        let first = format!("{}{}", call_span("slow_tool"), call_span("fast_tool"));
        let gateway = Arc::new(ScriptedGateway::new(&[&first, "done"]));
        let dispatcher = Arc::new(
            RecordingDispatcher::new(&["slow_tool", "fast_tool"])
                .with_delay("slow_tool", Duration::from_millis(60)),
        );
        let orchestrator = Orchestrator::new(gateway, dispatcher);

        let output = orchestrator.run(RunInput::new("race")).await.unwrap();
        let names: Vec<&str> = output
            .tool_results
            .iter()
            .map(|r| r.tool_name.as_str())
            .collect();
        assert_eq!(names, vec!["slow_tool", "fast_tool"]);

        let tool_entries: Vec<&str> = output
            .conversation
            .iter()
            .filter(|e| e.role == Role::Tool)
            .map(|e| e.content.as_str())
            .collect();
        assert!(tool_entries[0].starts_with("[slow_tool]"));
        assert!(tool_entries[1].starts_with("[fast_tool]"));
    }

    #[tokio::test]
    async fn thinking_is_captured_but_not_visible() {
        let gateway = Arc::new(ScriptedGateway::new(&[
            "<think>user wants brevity</think>Here you go.",
        ]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&[]));
        let orchestrator = Orchestrator::new(gateway, dispatcher);

        let output = orchestrator.run(RunInput::new("hi")).await.unwrap();
        assert_eq!(output.answer, "Here you go.");
        assert_eq!(output.thinking, vec!["user wants brevity".to_string()]);
    }

    #[tokio::test]
    async fn observer_sees_phases_and_terminal_status() {
        struct PhaseRecorder(StdMutex<Vec<RunPhase>>, StdMutex<Option<RunPhase>>);
        impl RunObserver for PhaseRecorder {
            fn on_phase_change(&self, phase: RunPhase) {
                self.0.lock().unwrap().push(phase);
            }
            fn on_finished(&self, phase: RunPhase) {
                *self.1.lock().unwrap() = Some(phase);
            }
        }

        let first = call_span("listEvents");
        let gateway = Arc::new(ScriptedGateway::new(&[&first, "done"]));
        let dispatcher = Arc::new(RecordingDispatcher::new(&["listEvents"]));
        let recorder = Arc::new(PhaseRecorder(
            StdMutex::new(Vec::new()),
            StdMutex::new(None),
        ));
        let orchestrator =
            Orchestrator::new(gateway, dispatcher).with_observer(recorder.clone());

        orchestrator.run(RunInput::new("hi")).await.unwrap();

        let phases = recorder.0.lock().unwrap().clone();
        assert_eq!(
            phases,
            vec![
                RunPhase::Generating,
                RunPhase::AwaitingTools,
                RunPhase::Generating,
                RunPhase::Completed,
            ]
        );
        assert_eq!(*recorder.1.lock().unwrap(), Some(RunPhase::Completed));
    }
}
