//! Phase catalog for the guided workflow.
//!
//! This module provides:
//! - `Phase` struct describing one stage of the workflow
//! - `PhaseCatalog`, the immutable ordered set of phases a session runs through
//! - `CatalogFile` for loading and saving catalogs as JSON
//! - the built-in Design Thinking catalog

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

use crate::errors::CatalogError;
use crate::sanitize::FieldRequirement;

/// A single stage of the workflow.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Phase {
    /// Unique identifier (e.g., "empathize")
    pub id: String,
    /// Position in the catalog, 0-based
    #[serde(default)]
    pub order: usize,
    /// Human-readable name of the phase
    pub name: String,
    /// Short explanation of what the phase is for
    #[serde(default)]
    pub description: String,
    /// Fields the phase form must contain before it can be completed
    #[serde(default)]
    pub fields: Vec<FieldRequirement>,
}

impl Phase {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            order: 0,
            name: name.to_string(),
            description: String::new(),
            fields: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldRequirement>) -> Self {
        self.fields = fields;
        self
    }
}

/// Immutable, ordered set of phases.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseCatalog {
    phases: Vec<Phase>,
}

impl PhaseCatalog {
    /// Build a catalog from phases listed in workflow order.
    ///
    /// Each phase's `order` is overwritten with its position.
    pub fn new(phases: Vec<Phase>) -> Result<Self, CatalogError> {
        let phases = phases
            .into_iter()
            .enumerate()
            .map(|(order, phase)| Phase { order, ..phase })
            .collect();
        Self::from_ordered(phases)
    }

    /// Build a catalog from phases carrying explicit `order` values.
    pub fn from_ordered(mut phases: Vec<Phase>) -> Result<Self, CatalogError> {
        if phases.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for phase in &phases {
            if !seen.insert(phase.id.as_str()) {
                return Err(CatalogError::DuplicateId {
                    id: phase.id.clone(),
                });
            }
        }

        phases.sort_by_key(|p| p.order);
        for (order, phase) in phases.iter_mut().enumerate() {
            phase.order = order;
        }

        Ok(Self { phases })
    }

    /// The seven-stage Design Thinking case workflow.
    pub fn design_thinking() -> Self {
        Self {
            phases: default_phases(),
        }
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false; a catalog holds at least one phase.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn first(&self) -> &Phase {
        &self.phases[0]
    }

    pub fn last(&self) -> &Phase {
        &self.phases[self.phases.len() - 1]
    }

    pub fn get(&self, id: &str) -> Option<&Phase> {
        self.phases.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.id == id)
    }

    /// The phase immediately before `id`, if any.
    pub fn predecessor(&self, id: &str) -> Option<&Phase> {
        let idx = self.position(id)?;
        idx.checked_sub(1).map(|i| &self.phases[i])
    }

    /// The phase immediately after `id`, if any.
    pub fn successor(&self, id: &str) -> Option<&Phase> {
        let idx = self.position(id)?;
        self.phases.get(idx + 1)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }
}

/// On-disk catalog format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub phases: Vec<Phase>,
}

impl CatalogFile {
    /// Load a catalog file from JSON.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| CatalogError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Save the catalog file as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), CatalogError> {
        let content = serde_json::to_string_pretty(self).map_err(|e| CatalogError::WriteFailed {
            path: path.to_path_buf(),
            source: e.into(),
        })?;

        std::fs::write(path, content).map_err(|source| CatalogError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Convert into a validated catalog. List position defines the order.
    pub fn into_catalog(self) -> Result<PhaseCatalog, CatalogError> {
        PhaseCatalog::new(self.phases)
    }
}

impl From<&PhaseCatalog> for CatalogFile {
    fn from(catalog: &PhaseCatalog) -> Self {
        Self {
            phases: catalog.phases.clone(),
        }
    }
}

/// Load a catalog from `path`, or fall back to the built-in workflow.
pub fn load_catalog_or_default(path: Option<&Path>) -> Result<PhaseCatalog, CatalogError> {
    match path {
        Some(path) => CatalogFile::load(path)?.into_catalog(),
        None => Ok(PhaseCatalog::design_thinking()),
    }
}

fn required(keys: &[&str]) -> Vec<FieldRequirement> {
    keys.iter().map(|k| FieldRequirement::required(k)).collect()
}

fn default_phases() -> Vec<Phase> {
    let mut empathize = vec![FieldRequirement::selection("tecnicas", 2)];
    empathize.extend(required(&[
        "objetivo",
        "usuarioObjetivo",
        "preguntas",
        "frustraciones",
        "insightPositivo",
        "metaInsight",
    ]));

    let mut ideate = vec![FieldRequirement::selection("tecnicas", 2)];
    ideate.extend(required(&[
        "ideas",
        "idea1",
        "idea1Factibilidad",
        "idea1Viabilidad",
        "idea1Deseabilidad",
        "idea2",
        "idea2Factibilidad",
        "idea2Viabilidad",
        "idea2Deseabilidad",
    ]));

    let phases = vec![
        Phase::new("context", "Contexto Empresarial")
            .with_description("Define la empresa y el desafío a resolver")
            .with_fields(required(&["empresa", "industria", "historia", "desafio"])),
        Phase::new("empathize", "Empatizar")
            .with_description("Comprende profundamente a tus usuarios")
            .with_fields(empathize),
        Phase::new("define", "Definir")
            .with_description("Sintetiza hallazgos en un problema claro")
            .with_fields(required(&[
                "personaNombre",
                "personaOcupacion",
                "personaMotivaciones",
                "personaFrustraciones",
                "personaCita",
                "pointOfView",
                "hmw1",
                "hmw2",
                "hmw3",
            ])),
        Phase::new("ideate", "Idear")
            .with_description("Genera múltiples soluciones creativas")
            .with_fields(ideate),
        Phase::new("prototype", "Prototipar")
            .with_description("Construye versiones tangibles de tus ideas")
            .with_fields(required(&[
                "prototipo1Tipo",
                "prototipo1Descripcion",
                "prototipo1Aspecto",
                "prototipo2Tipo",
                "prototipo2Descripcion",
                "prototipo2Aspecto",
            ])),
        Phase::new("test", "Testear")
            .with_description("Valida tus prototipos con usuarios reales")
            .with_fields(required(&[
                "metodo1",
                "tareas1",
                "feedback1",
                "metodo2",
                "tareas2",
                "feedback2",
                "feedbackNegativo",
                "iteracion",
            ])),
        Phase::new("results", "Resultados")
            .with_description("Define el MVP y métricas de éxito")
            .with_fields(required(&["mvpDescripcion", "mvpFuncionalidades", "kpi1", "kpi2"])),
    ];

    phases
        .into_iter()
        .enumerate()
        .map(|(order, phase)| Phase { order, ..phase })
        .collect()
}
