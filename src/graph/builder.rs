//! Graph construction from detected services and the captured event log
//!
//! Build order is fixed: seed domain nodes from the services list, replay
//! events in order through an exhaustive dispatch, then stamp the graph and
//! recompute derived statistics. The match over [`EventLog`] is closed; a
//! new event variant will not compile until every dispatch arm handles it.

use crate::config::EngineConfig;
use crate::dlp::{DataClassification, DlpManager};
use crate::error::Result;
use crate::graph::{
    AiProviderMetadata, DataTypeMetadata, DomainMetadata, EdgeMetadata, EdgeType,
    ExtensionMetadata, NodeMetadata, NodeType, SecurityGraph,
};
use crate::inputs::{
    AiPromptDetails, DetectedService, EventLog, ExtensionRequestDetails, NetworkRequestDetails,
};
use crate::scoring::{calculate_risk_score, DomainRiskFactors};
use chrono::Utc;
use std::collections::BTreeSet;
use tracing::{debug, warn};
use url::Url;

/// Risk floor applied to an AI prompt edge once sensitive data crosses it
const SENSITIVE_PROMPT_EDGE_FLOOR: f64 = 50.0;

/// Flat score bump per CSP violation report
const CSP_VIOLATION_BUMP: f64 = 5.0;

/// Builds a [`SecurityGraph`] from capture-layer inputs
pub struct GraphBuilder {
    /// Absent when DLP is disabled in configuration
    dlp: Option<DlpManager>,
}

impl GraphBuilder {
    /// Create a builder, compiling all DLP rules fail-fast
    pub fn new(config: &EngineConfig) -> Result<Self> {
        let dlp = if config.dlp.enabled {
            Some(DlpManager::from_config(&config.dlp)?)
        } else {
            None
        };
        Ok(Self { dlp })
    }

    /// Build the graph: seed domains from `services`, replay `events` in
    /// order, then refresh statistics and attack paths
    pub fn build(&self, services: &[DetectedService], events: &[EventLog]) -> SecurityGraph {
        let mut graph = SecurityGraph::new();

        for service in services {
            self.seed_domain(&mut graph, service);
        }
        for event in events {
            self.apply_event(&mut graph, event);
        }

        graph.set_last_updated(Utc::now().timestamp_millis());
        graph.refresh();
        graph
    }

    /// Seed one domain node from a detected service and score it
    fn seed_domain(&self, graph: &mut SecurityGraph, service: &DetectedService) {
        let metadata = DomainMetadata {
            has_login: service.has_login_page,
            has_privacy_policy: service.privacy_policy_url.is_some(),
            has_terms_of_service: service.terms_of_service_url.is_some(),
            is_nrd: service.nrd_result.as_ref().is_some_and(|r| r.is_nrd),
            nrd_confidence: service
                .nrd_result
                .as_ref()
                .filter(|r| r.is_nrd)
                .map(|r| r.confidence),
            is_typosquat: service
                .typosquat_result
                .as_ref()
                .is_some_and(|r| r.is_typosquat),
            typosquat_confidence: service
                .typosquat_result
                .as_ref()
                .filter(|r| r.is_typosquat)
                .map(|r| r.confidence),
            cookie_count: service.cookies.len() as u64,
            session_cookie_count: service.cookies.iter().filter(|c| c.is_session).count() as u64,
            csp_violation_count: 0,
        };
        let score = calculate_risk_score(&metadata.risk_factors());

        let node = graph.ensure_node(
            NodeType::Domain,
            &service.domain,
            &service.domain,
            || NodeMetadata::Domain(DomainMetadata::default()),
            service.detected_at,
        );
        // a later services entry for the same domain wins wholesale, so the
        // stored metadata always matches the score derived from it
        node.metadata = NodeMetadata::Domain(metadata);
        node.set_risk(score);
    }

    /// Dispatch one event; exhaustive over the closed event union
    fn apply_event(&self, graph: &mut SecurityGraph, event: &EventLog) {
        match event {
            EventLog::AiPromptSent {
                domain,
                timestamp,
                details,
            } => self.on_ai_prompt(graph, domain, *timestamp, details),
            EventLog::AiResponseReceived {
                domain,
                timestamp,
                details,
            } => {
                // Response events only advance the provider's last_seen;
                // prompt accounting happened on the outbound event
                let key = details.inferred_provider.as_deref().unwrap_or(domain);
                let id = crate::graph::node_id(NodeType::AiProvider, key);
                if let Some(node) = graph.node_mut(&id) {
                    node.touch(*timestamp);
                }
            }
            EventLog::ExtensionRequest {
                timestamp, details, ..
            } => self.on_extension_request(graph, *timestamp, details),
            EventLog::NetworkRequest {
                domain,
                timestamp,
                details,
            } => self.on_network_request(graph, domain, *timestamp, details),
            EventLog::LoginDetected { domain, timestamp } => {
                let node = ensure_domain(graph, domain, *timestamp);
                let score = node.metadata.as_domain_mut().map(|meta| {
                    meta.has_login = true;
                    calculate_risk_score(&meta.risk_factors())
                });
                if let Some(score) = score {
                    node.set_risk(score);
                }
            }
            EventLog::CspViolation { domain, timestamp } => {
                let node = ensure_domain(graph, domain, *timestamp);
                if let Some(meta) = node.metadata.as_domain_mut() {
                    meta.csp_violation_count += 1;
                }
                // flat bump, not a full recompute
                let score = node.risk_score + CSP_VIOLATION_BUMP;
                node.set_risk(score);
            }
            EventLog::Unknown {
                event_type, domain, ..
            } => {
                debug!(event_type = %event_type, domain = %domain, "Ignoring unknown event");
            }
        }
    }

    fn on_ai_prompt(
        &self,
        graph: &mut SecurityGraph,
        domain: &str,
        timestamp: i64,
        details: &AiPromptDetails,
    ) {
        let domain_id = ensure_domain(graph, domain, timestamp).id.clone();
        let text = &details.prompt_content.text;

        let provider_key = details.inferred_provider.as_deref().unwrap_or(domain);
        let provider_id = {
            let node = graph.ensure_node(
                NodeType::AiProvider,
                provider_key,
                provider_key,
                || NodeMetadata::AiProvider(AiProviderMetadata::default()),
                timestamp,
            );
            if let NodeMetadata::AiProvider(meta) = &mut node.metadata {
                meta.prompt_count += 1;
                if let Some(model) = &details.model {
                    meta.models.insert(model.clone());
                }
                meta.estimated_tokens += text.chars().count() as u64;
            }
            node.id.clone()
        };

        let classifications: BTreeSet<DataClassification> = match &self.dlp {
            Some(dlp) => dlp
                .analyze(text)
                .results
                .iter()
                .map(|r| r.classification)
                .collect(),
            None => BTreeSet::new(),
        };

        for &classification in &classifications {
            let data_type_id = {
                let node = graph.ensure_node(
                    NodeType::DataType,
                    classification.as_str(),
                    classification.as_str(),
                    || {
                        NodeMetadata::DataType(DataTypeMetadata {
                            classification,
                            occurrences: 0,
                            domains: BTreeSet::new(),
                        })
                    },
                    timestamp,
                );
                if let NodeMetadata::DataType(meta) = &mut node.metadata {
                    meta.occurrences += 1;
                    meta.domains.insert(domain.to_string());
                }
                node.id.clone()
            };

            let edge = graph.upsert_edge(EdgeType::SendsData, &domain_id, &data_type_id, timestamp);
            if let EdgeMetadata::SendsData { data_types } = &mut edge.metadata {
                data_types.insert(classification);
            }
        }

        let edge = graph.upsert_edge(EdgeType::AiPrompt, &domain_id, &provider_id, timestamp);
        if let EdgeMetadata::AiPrompt {
            data_types,
            has_credentials,
            has_pii,
        } = &mut edge.metadata
        {
            data_types.extend(classifications.iter().copied());
            *has_credentials |= classifications.contains(&DataClassification::Credentials);
            *has_pii |= classifications.contains(&DataClassification::Pii);
        }
        if !classifications.is_empty() {
            edge.elevate_risk(SENSITIVE_PROMPT_EDGE_FLOOR);
        }
    }

    fn on_extension_request(
        &self,
        graph: &mut SecurityGraph,
        timestamp: i64,
        details: &ExtensionRequestDetails,
    ) {
        let label = details
            .extension_name
            .clone()
            .unwrap_or_else(|| details.extension_id.clone());
        let ext_id = {
            let node = graph.ensure_node(
                NodeType::Extension,
                &details.extension_id,
                &label,
                || {
                    NodeMetadata::Extension(ExtensionMetadata {
                        extension_id: details.extension_id.clone(),
                        extension_name: details.extension_name.clone(),
                        request_count: 0,
                        domains: BTreeSet::new(),
                    })
                },
                timestamp,
            );
            let request_count = match &mut node.metadata {
                NodeMetadata::Extension(meta) => {
                    meta.request_count += 1;
                    meta.request_count
                }
                _ => 0,
            };
            node.set_risk(calculate_risk_score(&DomainRiskFactors {
                extension_request_count: request_count,
                ..Default::default()
            }));
            node.id.clone()
        };

        let Some(host) = parse_host(&details.url, "extension request") else {
            return;
        };

        let target_id = ensure_domain(graph, &host, timestamp).id.clone();
        let edge = graph.upsert_edge(EdgeType::ExtensionRequest, &ext_id, &target_id, timestamp);
        if let EdgeMetadata::ExtensionRequest {
            request_count,
            methods,
        } = &mut edge.metadata
        {
            *request_count += 1;
            if let Some(method) = &details.method {
                methods.insert(method.to_uppercase());
            }
        }

        if let Some(node) = graph.node_mut(&ext_id) {
            if let NodeMetadata::Extension(meta) = &mut node.metadata {
                meta.domains.insert(host);
            }
        }
    }

    fn on_network_request(
        &self,
        graph: &mut SecurityGraph,
        domain: &str,
        timestamp: i64,
        details: &NetworkRequestDetails,
    ) {
        let source_id = ensure_domain(graph, domain, timestamp).id.clone();

        let Some(host) = parse_host(&details.url, "network request") else {
            return;
        };
        // same-origin traffic produces no edge
        if host == domain {
            return;
        }

        let target_id = ensure_domain(graph, &host, timestamp).id.clone();
        let edge = graph.upsert_edge(EdgeType::Requests, &source_id, &target_id, timestamp);
        if let EdgeMetadata::Requests {
            request_count,
            methods,
        } = &mut edge.metadata
        {
            *request_count += 1;
            if let Some(method) = &details.method {
                methods.insert(method.to_uppercase());
            }
        }
    }
}

/// Fetch-or-create a bare domain node for an event-only domain
///
/// Domains first seen through events carry default metadata and score 0
/// until a later event or a services entry says otherwise.
fn ensure_domain<'a>(
    graph: &'a mut SecurityGraph,
    domain: &str,
    timestamp: i64,
) -> &'a mut crate::graph::GraphNode {
    graph.ensure_node(
        NodeType::Domain,
        domain,
        domain,
        || NodeMetadata::Domain(DomainMetadata::default()),
        timestamp,
    )
}

/// Extract the host from a request URL; unparseable URLs are skipped
fn parse_host(raw: &str, context: &str) -> Option<String> {
    match Url::parse(raw) {
        Ok(url) => match url.host_str() {
            Some(host) => Some(host.to_string()),
            None => {
                warn!(url = %raw, context, "Request URL has no host, skipping");
                None
            }
        },
        Err(e) => {
            warn!(url = %raw, context, error = %e, "Unparseable request URL, skipping");
            None
        }
    }
}
