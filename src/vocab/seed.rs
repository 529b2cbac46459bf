//! Built-in sample library and daily topic pool

use super::models::{Sentence, Term};

pub const DEFAULT_TOPICS: &[&str] = &[
    "Project Management",
    "Negotiation Strategies",
    "Financial Markets",
    "Remote Leadership",
    "Agile Methodology",
    "Client Relations",
    "Digital Transformation",
];

pub fn default_topics() -> Vec<String> {
    DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
}

fn term(
    id: &str,
    en: &str,
    zh: &str,
    explanation: &str,
    examples: [&str; 2],
    category: &str,
) -> Term {
    Term {
        id: id.to_string(),
        term_en: en.to_string(),
        term_zh: zh.to_string(),
        explanation: explanation.to_string(),
        examples: examples.iter().map(|e| e.to_string()).collect(),
        image_url: None,
        category: category.to_string(),
        saved: false,
        user_notes: None,
    }
}

fn sentence(id: &str, content: &str, category: &str) -> Sentence {
    Sentence {
        id: id.to_string(),
        content: content.to_string(),
        category: category.to_string(),
        saved: false,
    }
}

pub fn sample_terms() -> Vec<Term> {
    vec![
        term(
            "t1",
            "Deliverable",
            "交付成果",
            "A tangible or intangible good or service produced as a result of a project.",
            [
                "Please ensure all key deliverables are met by Q3.",
                "The final report is a critical deliverable for this phase.",
            ],
            "Project Management",
        ),
        term(
            "t2",
            "Stakeholder Alignment",
            "利益相关者对齐",
            "The process of ensuring all parties involved agree on goals and direction.",
            [
                "We need stakeholder alignment before proceeding with the budget increase.",
                "Lack of alignment caused significant delays.",
            ],
            "Consulting",
        ),
        term(
            "t3",
            "Scalability",
            "可扩展性",
            "The capability of a system to handle a growing amount of work.",
            [
                "The current architecture lacks scalability for our 5-year growth plan.",
                "We chose this cloud provider for its instant scalability.",
            ],
            "Tech",
        ),
        term(
            "t4",
            "Pain Point",
            "痛点",
            "A specific problem that prospective customers of your business are experiencing.",
            [
                "Our solution directly addresses the customer's main pain point: efficiency.",
                "Identify the client's pain points during the discovery call.",
            ],
            "Sales/Consulting",
        ),
        term(
            "t5",
            "Bandwidth",
            "精力 / 资源",
            "The energy or mental capacity required to deal with a situation.",
            [
                "I don't have the bandwidth to take on another project right now.",
                "Do we have the team bandwidth to support this launch?",
            ],
            "General Business",
        ),
        term(
            "t6",
            "Low-hanging Fruit",
            "唾手可得的成果",
            "Targets or goals which are easily achievable and which do not require a lot of effort.",
            [
                "Let's target the low-hanging fruit first to build momentum.",
                "Optimizing the signup form is low-hanging fruit for increasing conversions.",
            ],
            "Strategy",
        ),
        term(
            "t7",
            "KPI (Key Performance Indicator)",
            "关键绩效指标",
            "A measurable value that demonstrates how effectively a company is achieving key business objectives.",
            [
                "We need to define clear KPIs for the marketing campaign.",
                "Revenue growth is our primary KPI this quarter.",
            ],
            "Management",
        ),
        term(
            "t8",
            "Bottleneck",
            "瓶颈",
            "A point of congestion in a production system that slows down the process.",
            [
                "The approval process is the main bottleneck right now.",
                "We need to identify and remove bottlenecks in the supply chain.",
            ],
            "Operations",
        ),
    ]
}

pub fn sample_sentences() -> Vec<Sentence> {
    vec![
        sentence(
            "s1",
            "Could you please clarify the timeline for the next phase?",
            "Clarification",
        ),
        sentence(
            "s2",
            "I'd like to circle back to the point raised about budget constraints.",
            "Meetings",
        ),
        sentence(
            "s3",
            "Let's take this offline to avoid holding up the meeting.",
            "Meetings",
        ),
        sentence(
            "s4",
            "Moving forward, we should align our weekly updates with the client's schedule.",
            "Project Updates",
        ),
        sentence(
            "s5",
            "I want to ensure we are all on the same page regarding the deliverables.",
            "Alignment",
        ),
        sentence(
            "s6",
            "Please find attached the minutes from today's discussion for your review.",
            "Email",
        ),
    ]
}
