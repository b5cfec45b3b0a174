use crate::models::{Chapter, ChapterIcon, Section};

fn section(subtitle: &str, points: &[&str], code: Option<&str>) -> Section {
    Section {
        subtitle: subtitle.to_string(),
        points: points.iter().map(|p| p.to_string()).collect(),
        code: code.map(str::to_string),
    }
}

/// The built-in course shown while no learning context is loaded.
pub fn default_chapters() -> Vec<Chapter> {
    vec![
        Chapter {
            id: 1,
            title: "The AI Engineer's Role".to_string(),
            color: "bg-blue-100 text-blue-700".to_string(),
            icon: ChapterIcon::Code,
            sections: vec![
                section(
                    "Architecture & Modeling",
                    &[
                        "**Model design**: pick the architecture (Transformers, CNN, GNN) that fits the problem.",
                        "**Fine-tuning**: adapt foundation models (LLMs, ViT) to domain-specific data.",
                        "**Data engineering**: build robust pipelines for ingesting and cleaning data.",
                    ],
                    Some(
                        "from transformers import AutoModelForCausalLM\n\n# Load a model for fine-tuning\nmodel = AutoModelForCausalLM.from_pretrained(\"mistralai/Mistral-7B\")",
                    ),
                ),
                section(
                    "Deployment & Production",
                    &[
                        "**Inference**: optimize latency and throughput (quantization, pruning).",
                        "**API**: serve the model through FastAPI or Flask.",
                        "**Monitoring**: watch for *data drift* and live performance.",
                    ],
                    None,
                ),
            ],
        },
        Chapter {
            id: 2,
            title: "Future & Emerging Topics".to_string(),
            color: "bg-purple-100 text-purple-700".to_string(),
            icon: ChapterIcon::Lightning,
            sections: vec![
                section(
                    "Neuro-symbolic AI",
                    &[
                        "**Concept**: neural networks (learning) combined with symbolic logic (reasoning).",
                        "**Benefit**: deep learning's robustness to noise plus the explainability of logic.",
                        "**Outlook**: key for AI that reasons reliably and transparently.",
                    ],
                    None,
                ),
                section(
                    "Spiking Neural Networks (SNN)",
                    &[
                        "**Biomimicry**: imitates the impulse-driven behavior of biological neurons.",
                        "**Efficiency**: drastically lower energy use on neuromorphic hardware.",
                        "**Use case**: embedded robotics, ultra-low-power IoT sensors.",
                    ],
                    None,
                ),
                section(
                    "Liquid Neural Networks",
                    &[
                        "**Adaptability**: the model keeps learning after training, in real time.",
                        "**Stability**: robust to unexpected distribution shifts.",
                    ],
                    None,
                ),
            ],
        },
        Chapter {
            id: 3,
            title: "Careers & Growth".to_string(),
            color: "bg-green-100 text-green-700".to_string(),
            icon: ChapterIcon::Layers,
            sections: vec![
                section(
                    "Beyond Code",
                    &[
                        "**MLOps engineer**: automation, CI/CD and ML infrastructure.",
                        "**AI architect**: system-wide vision, technology choices and scalability.",
                        "**AI ethicist**: bias audits, compliance (AI Act) and societal impact.",
                    ],
                    None,
                ),
                section(
                    "The Senior Profile (10+ years)",
                    &[
                        "**Strategic vision**: spot disruptions (like LLMs) before they go mainstream.",
                        "**System design**: complex AI ecosystems (data lake -> training -> edge).",
                        "**Mentoring**: grow juniors and set quality standards.",
                    ],
                    None,
                ),
            ],
        },
        Chapter {
            id: 4,
            title: "Expert Performance".to_string(),
            color: "bg-orange-100 text-orange-700".to_string(),
            icon: ChapterIcon::Lightning,
            sections: vec![section(
                "Advanced Optimization",
                &[
                    "**Kernel optimization**: custom CUDA kernels to maximize GPU usage.",
                    "**Distributed training**: data and model parallelism on clusters (Ray, Horovod).",
                    "**Distillation**: compress large models (teacher) into light ones (student) without major loss.",
                ],
                None,
            )],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_chapters_have_unique_sequential_ids() {
        let chapters = default_chapters();
        assert_eq!(chapters.len(), 4);
        let ids: HashSet<u32> = chapters.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), chapters.len());
        assert_eq!(chapters[0].id, 1);
    }

    #[test]
    fn test_default_chapters_are_stable() {
        assert_eq!(default_chapters(), default_chapters());
    }

    #[test]
    fn test_every_chapter_has_content() {
        for chapter in default_chapters() {
            assert!(!chapter.sections.is_empty(), "{} is empty", chapter.title);
            assert!(chapter.sections.iter().all(|s| !s.points.is_empty()));
        }
    }
}
