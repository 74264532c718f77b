// Project Code Generation System
// Renders a validated GenerationRequest into the files of a FastAPI project

pub mod models_generator;
pub mod routes_generator;
pub mod tests_generator;
pub mod utils;

use std::collections::BTreeMap;
use tracing::debug;
use crate::error::AppResult;
use crate::schema::GenerationRequest;

pub use routes_generator::HANDLERS_PER_ENTITY;

/// Preview keys exposed to the UI
pub const PREVIEW_MODELS_KEY: &str = "models.py";
pub const PREVIEW_MAIN_KEY: &str = "main.py";

/// Every file the generator can emit. The set is closed: each variant
/// knows its path and how to render itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    PackageMarker,
    Models,
    Routes,
    Manifest,
    TestPackageMarker,
    Tests,
}

impl Artifact {
    pub fn path(&self) -> &'static str {
        match self {
            Artifact::PackageMarker => "app/__init__.py",
            Artifact::Models => "app/models.py",
            Artifact::Routes => "app/main.py",
            Artifact::Manifest => "requirements.txt",
            Artifact::TestPackageMarker => "tests/__init__.py",
            Artifact::Tests => "tests/test_main.py",
        }
    }

    fn render(&self, request: &GenerationRequest) -> AppResult<String> {
        match self {
            Artifact::PackageMarker | Artifact::TestPackageMarker => Ok(String::new()),
            Artifact::Models => models_generator::ModelsGenerator::new(request).generate_models(),
            Artifact::Routes => routes_generator::RoutesGenerator::new(request).generate_routes(),
            Artifact::Manifest => Ok(MANIFEST.to_string()),
            Artifact::Tests => tests_generator::TestsGenerator::new(request).generate_tests(),
        }
    }
}

const MANIFEST: &str = "fastapi\nuvicorn\nhttpx\npytest\n";

/// Which subset of artifacts to emit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// Package marker, models, routes and manifest
    Preview,
    /// Preview set plus the test package
    Full,
}

impl RenderMode {
    pub fn artifacts(&self) -> &'static [Artifact] {
        match self {
            RenderMode::Preview => &[
                Artifact::PackageMarker,
                Artifact::Models,
                Artifact::Routes,
                Artifact::Manifest,
            ],
            RenderMode::Full => &[
                Artifact::PackageMarker,
                Artifact::Models,
                Artifact::Routes,
                Artifact::Manifest,
                Artifact::TestPackageMarker,
                Artifact::Tests,
            ],
        }
    }
}

/// Main code generator orchestrator
pub struct CodeGenerator<'a> {
    request: &'a GenerationRequest,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self { request }
    }

    /// Render every artifact of `mode`. Output is keyed by relative path and
    /// depends only on the request.
    pub fn generate_all(&self, mode: RenderMode) -> AppResult<BTreeMap<String, String>> {
        let mut files = BTreeMap::new();

        for artifact in mode.artifacts() {
            let content = artifact.render(self.request)?;
            debug!("Rendered {} ({} bytes)", artifact.path(), content.len());
            files.insert(artifact.path().to_string(), content);
        }

        Ok(files)
    }
}

pub fn render(request: &GenerationRequest, mode: RenderMode) -> AppResult<BTreeMap<String, String>> {
    CodeGenerator::new(request).generate_all(mode)
}

/// Project a rendered file set onto the two preview keys
pub fn preview(files: &BTreeMap<String, String>) -> BTreeMap<String, String> {
    let pick = |artifact: Artifact| files.get(artifact.path()).cloned().unwrap_or_default();

    BTreeMap::from([
        (PREVIEW_MODELS_KEY.to_string(), pick(Artifact::Models)),
        (PREVIEW_MAIN_KEY.to_string(), pick(Artifact::Routes)),
    ])
}
