use once_cell::sync::Lazy;

use crate::domain::{DomainCatalog, DomainColors, DomainDescriptor, DomainId};

/// The site's domain table, shared read-only by every consumer.
pub static BUILTIN: Lazy<DomainCatalog> =
    Lazy::new(|| DomainCatalog::new_unchecked(builtin_descriptors()));

#[allow(clippy::too_many_arguments)]
fn descriptor(
    id: DomainId,
    title: &str,
    subtitle: &str,
    description: &str,
    route: &str,
    colors: [&str; 3],
    loader_messages: [&str; 3],
    avatar_form: &str,
    order: u32,
) -> DomainDescriptor {
    let [primary, secondary, glow] = colors;
    DomainDescriptor {
        id,
        title: title.to_string(),
        subtitle: subtitle.to_string(),
        description: description.to_string(),
        route: route.to_string(),
        colors: DomainColors {
            primary: primary.to_string(),
            secondary: secondary.to_string(),
            glow: glow.to_string(),
        },
        loader_messages: loader_messages.iter().map(|m| m.to_string()).collect(),
        avatar_form: avatar_form.to_string(),
        order,
    }
}

fn builtin_descriptors() -> Vec<DomainDescriptor> {
    vec![
        descriptor(
            DomainId::Landing,
            "Engineer for the Edge",
            "Backend | Cloud | AI | Web3",
            "Building scalable systems in niche domains. From financial intelligence to decentralized networks.",
            "/",
            ["#7c5cfc", "#a78bfa", "rgba(124, 92, 252, 0.25)"],
            [
                "Initializing portfolio...",
                "Loading systems...",
                "Preparing journey...",
            ],
            "base",
            0,
        ),
        descriptor(
            DomainId::Backend,
            "Backend Engineering",
            "Scalable Systems & Architecture",
            "Designing production-grade APIs, event-driven systems, and clean architecture. From monoliths to microservices: structure, breakdown, scale.",
            "/backend",
            ["#8b5cf6", "#a78bfa", "rgba(139, 92, 246, 0.3)"],
            [
                "Initializing scalable systems...",
                "Building API layers...",
                "Structuring architecture...",
            ],
            "tech",
            1,
        ),
        descriptor(
            DomainId::Cloud,
            "Cloud-Native & CNCF",
            "Infrastructure at Scale",
            "Exploring Kubernetes, observability, and deployment pipelines. Building reliable, distributed systems on cloud-native foundations.",
            "/cloud",
            ["#f97316", "#fb923c", "rgba(249, 115, 22, 0.3)"],
            [
                "Orchestrating infrastructure...",
                "Deploying services...",
                "Spinning up clusters...",
            ],
            "distributed",
            2,
        ),
        descriptor(
            DomainId::Ai,
            "AI Tools & Copilots",
            "Intelligent Systems",
            "Engineering AI into production systems. Multi-agent orchestration, RAG pipelines, and developer tooling powered by LLMs.",
            "/ai",
            ["#10b981", "#ec4899", "rgba(16, 185, 129, 0.3)"],
            [
                "Booting neural networks...",
                "Loading language models...",
                "Initializing agents...",
            ],
            "luminous",
            3,
        ),
        descriptor(
            DomainId::Web3,
            "Web3 / Blockchain",
            "Decentralized & On-Chain",
            "Experimenting with smart contracts, on-chain architecture, and cloud-chain hybrid systems. Exploring the decentralization frontier.",
            "/web3",
            ["#a855f7", "#f59e0b", "rgba(168, 85, 247, 0.3)"],
            [
                "Deploying smart contracts...",
                "Initializing blockchain...",
                "Syncing ledgers...",
            ],
            "crystalline",
            4,
        ),
    ]
}
