//! Wires the picker to the Markdown and screenshot pipelines.

use std::sync::Arc;
use std::time::Instant;

use url::Url;

use crate::capture;
use crate::clipboard::{ClipboardArtifact, ClipboardBackend, ClipboardWriter, ImageViewer, WriteOutcome};
use crate::config::PickerConfig;
use crate::error::{ClipError, Result};
use crate::markdown::MarkdownConverter;
use crate::messages::{PipelineRequest, PipelineResponse};
use crate::normalize::Normalizer;
use crate::notify::{Notifier, messages};
use crate::picker::{
    CaptureMode, ElementHandle, EventDisposition, HostPage, PageEvent, SelectionSession, SessionManager,
    SessionOutcome, StartOutcome, coalesce,
};

/// How a session ended, from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    Delivered(WriteOutcome),
    Cancelled,
    /// The user has already been told what went wrong
    Failed,
}

/// Runs one picker session at a time against a page
pub struct Orchestrator<P: HostPage + ?Sized, B, V, N> {
    page: Arc<P>,
    sessions: SessionManager,
    session: Option<SelectionSession<P>>,
    writer: ClipboardWriter<B, V>,
    notifier: N,
    converter: MarkdownConverter,
    config: PickerConfig,
    last_outcome: Option<PipelineOutcome>,
}

impl<P, B, V, N> Orchestrator<P, B, V, N>
where
    P: HostPage + ?Sized,
    B: ClipboardBackend,
    V: ImageViewer,
    N: Notifier,
{
    pub fn new(page: Arc<P>, writer: ClipboardWriter<B, V>, notifier: N) -> Self {
        Self {
            page,
            sessions: SessionManager::new(),
            session: None,
            writer,
            notifier,
            converter: MarkdownConverter::new(),
            config: PickerConfig::default(),
            last_outcome: None,
        }
    }

    pub fn with_config(mut self, config: PickerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_converter(mut self, converter: MarkdownConverter) -> Self {
        self.converter = converter;
        self
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    pub fn writer(&self) -> &ClipboardWriter<B, V> {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut ClipboardWriter<B, V> {
        &mut self.writer
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Outcome of the most recently finished session
    pub fn last_outcome(&self) -> Option<PipelineOutcome> {
        self.last_outcome
    }

    /// Begin picking. Does nothing if a session is already running.
    pub fn start_selection(&mut self, mode: CaptureMode) -> Result<StartOutcome> {
        let Some(guard) = self.sessions.try_acquire() else {
            log::debug!("Picker already active, ignoring start request");
            return Ok(StartOutcome::AlreadyActive);
        };

        let session = SelectionSession::start(Arc::clone(&self.page), mode, guard, &self.config)?;
        self.session = Some(session);
        self.last_outcome = None;
        Ok(StartOutcome::Started)
    }

    /// Feed one page event to the running session
    pub fn dispatch(&mut self, event: &PageEvent) -> Result<EventDisposition> {
        let Some(session) = self.session.as_mut() else {
            return Ok(EventDisposition::PassThrough);
        };

        let disposition = match session.handle_event(event) {
            Ok(disposition) => disposition,
            Err(e) => {
                self.abandon();
                return Err(e);
            }
        };

        if session.is_finished() {
            let outcome = session.take_outcome();
            // Dropping the session releases the guard before any processing starts
            self.session = None;
            match outcome {
                Some(SessionOutcome::Selected { element, mode }) => {
                    self.last_outcome = Some(self.finish(element, mode));
                }
                Some(SessionOutcome::Cancelled) | None => {
                    self.last_outcome = Some(PipelineOutcome::Cancelled);
                }
            }
        }

        Ok(disposition)
    }

    /// Drain and dispatch everything the page has queued
    pub fn pump(&mut self) -> Result<usize> {
        if self.session.is_none() {
            return Ok(0);
        }

        let events = match self.page.poll_events() {
            Ok(events) => coalesce(events),
            Err(e) => {
                self.abandon();
                return Err(e);
            }
        };

        let count = events.len();
        for event in &events {
            self.dispatch(event)?;
            if self.session.is_none() {
                break;
            }
        }
        Ok(count)
    }

    /// Pick one element and deliver it, blocking until the session ends
    pub fn run(&mut self, mode: CaptureMode) -> Result<PipelineOutcome> {
        if self.start_selection(mode)? == StartOutcome::AlreadyActive {
            return Err(ClipError::Page("A picker session is already running".to_string()));
        }

        let mut last_activity = Instant::now();
        while self.is_active() {
            if self.pump()? > 0 {
                last_activity = Instant::now();
            }
            if !self.is_active() {
                break;
            }

            if let Some(timeout) = self.config.idle_timeout
                && last_activity.elapsed() >= timeout
            {
                log::info!("No interaction for {:?}, stopping picker", timeout);
                self.abandon();
                self.last_outcome = Some(PipelineOutcome::Cancelled);
                break;
            }
            std::thread::sleep(self.config.poll_interval);
        }

        Ok(self.last_outcome.unwrap_or(PipelineOutcome::Cancelled))
    }

    /// Tear down the running session, if any, without a selection
    pub fn abandon(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.abort();
        }
    }

    /// Run the pipeline for a confirmed element and tell the user how it went
    fn finish(&mut self, element: ElementHandle, mode: CaptureMode) -> PipelineOutcome {
        let result = self
            .request_for(element, mode)
            .map(|request| self.handle_request(request))
            .and_then(|response| match response {
                PipelineResponse::Artifact { artifact } => self.writer.write(artifact),
                PipelineResponse::Failed { message } => Err(ClipError::Page(message)),
            });

        match (mode, result) {
            (CaptureMode::Markdown, Ok(_)) => {
                self.notifier.notify(messages::MARKDOWN_COPIED, true);
                PipelineOutcome::Delivered(WriteOutcome::Copied)
            }
            (CaptureMode::Screenshot, Ok(WriteOutcome::Copied)) => {
                self.notifier.notify(messages::SCREENSHOT_COPIED, true);
                PipelineOutcome::Delivered(WriteOutcome::Copied)
            }
            (CaptureMode::Screenshot, Ok(WriteOutcome::OpenedInViewer)) => {
                self.notifier.notify(messages::SCREENSHOT_OPENED, true);
                PipelineOutcome::Delivered(WriteOutcome::OpenedInViewer)
            }
            (mode, Err(e)) => {
                log::error!("{} pipeline failed: {}", mode, e);
                let message = match mode {
                    CaptureMode::Markdown => messages::COPY_FAILED,
                    CaptureMode::Screenshot => messages::SCREENSHOT_FAILED,
                };
                self.notifier.notify(message, false);
                PipelineOutcome::Failed
            }
        }
    }

    /// Gather what the processing side needs from the page
    fn request_for(&self, element: ElementHandle, mode: CaptureMode) -> Result<PipelineRequest> {
        match mode {
            CaptureMode::Markdown => Ok(PipelineRequest::ConvertMarkdown {
                html: self.page.outer_html(element)?,
                base_url: self.page.base_url()?,
            }),
            CaptureMode::Screenshot => Ok(PipelineRequest::CaptureScreenshot {
                rect: capture::locate_element(self.page.as_ref(), element, self.config.settle_delay)?,
            }),
        }
    }

    /// Turn a request into an artifact, or the reason it could not be made
    pub fn handle_request(&self, request: PipelineRequest) -> PipelineResponse {
        log::debug!("Handling {} request", request.kind());
        match self.process(request) {
            Ok(artifact) => PipelineResponse::Artifact { artifact },
            Err(e) => PipelineResponse::Failed { message: e.to_string() },
        }
    }

    fn process(&self, request: PipelineRequest) -> Result<ClipboardArtifact> {
        match request {
            PipelineRequest::ConvertMarkdown { html, base_url } => {
                let base = Url::parse(&base_url)
                    .map_err(|e| ClipError::Conversion(format!("Invalid base URL {}: {}", base_url, e)))?;
                let fragment = Normalizer::new(base).normalize_html(&html);
                let content = self.converter.convert(&fragment.html)?;
                log::debug!("Converted markdown length: {}", content.len());
                Ok(ClipboardArtifact::Text { content })
            }
            PipelineRequest::CaptureScreenshot { rect } => {
                let raster = self.page.capture_viewport()?;
                capture::crop(&raster, &rect)
            }
        }
    }
}
