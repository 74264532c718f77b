// FastAPI application generator (app/main.py)
// Five CRUD handlers per entity over an in-memory store
use std::fmt::Write;
use crate::error::AppResult;
use crate::schema::{EntitySchema, GenerationRequest};
use super::utils::{self, EntityNames};

/// Handlers emitted for every entity: list, get, create, update, delete
pub const HANDLERS_PER_ENTITY: usize = 5;

pub struct RoutesGenerator<'a> {
    request: &'a GenerationRequest,
}

impl<'a> RoutesGenerator<'a> {
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self { request }
    }

    pub fn generate_routes(&self) -> AppResult<String> {
        let mut content = utils::generate_file_header();

        content.push_str(&self.generate_imports()?);
        content.push_str("\napp = _fastapi.FastAPI(title=\"Generated CRUD API\")\n");

        for entity in &self.request.entities {
            content.push_str(&self.generate_entity_routes(entity)?);
        }

        Ok(content)
    }

    /// Template helpers are bound to underscore aliases so entity names
    /// (`Next`, `Dict`, `FastAPI`, ...) cannot shadow them
    fn generate_imports(&self) -> AppResult<String> {
        let mut imports = String::new();
        imports.push_str("import builtins as _builtins\n");
        imports.push_str("import itertools as _itertools\n");
        imports.push_str("import typing as _typing\n\n");
        imports.push_str("import fastapi as _fastapi\n");

        if !self.request.entities.is_empty() {
            let classes: Vec<&str> = self.request.entities.iter().map(|e| e.name.as_str()).collect();
            writeln!(imports, "\nfrom app.models import {}", classes.join(", "))?;
        }

        Ok(imports)
    }

    fn generate_entity_routes(&self, entity: &EntitySchema) -> AppResult<String> {
        let EntityNames { class, snake, collection } = EntityNames::for_entity(entity);
        let mut routes = String::new();

        writeln!(routes, "\n\n# {class}\n")?;
        writeln!(routes, "{collection}_db: _typing.Dict[int, {class}] = {{}}")?;
        writeln!(routes, "{snake}_ids = _itertools.count(1)")?;

        // list
        writeln!(routes, "\n\n@app.get(\"/{collection}\")")?;
        writeln!(routes, "def list_{collection}():")?;
        writeln!(
            routes,
            "    return [{{\"id\": {snake}_id, **{snake}.model_dump()}} for {snake}_id, {snake} in {collection}_db.items()]"
        )?;

        // get by id
        writeln!(routes, "\n\n@app.get(\"/{collection}/{{{snake}_id}}\")")?;
        writeln!(routes, "def get_{snake}({snake}_id: int):")?;
        writeln!(routes, "    {snake} = {collection}_db.get({snake}_id)")?;
        writeln!(routes, "    if {snake} is None:")?;
        writeln!(routes, "        raise _fastapi.HTTPException(status_code=404, detail=\"{class} not found\")")?;
        writeln!(routes, "    return {{\"id\": {snake}_id, **{snake}.model_dump()}}")?;

        // create
        writeln!(routes, "\n\n@app.post(\"/{collection}\", status_code=201)")?;
        writeln!(routes, "def create_{snake}({snake}: {class}):")?;
        writeln!(routes, "    {snake}_id = _builtins.next({snake}_ids)")?;
        writeln!(routes, "    {collection}_db[{snake}_id] = {snake}")?;
        writeln!(routes, "    return {{\"id\": {snake}_id, **{snake}.model_dump()}}")?;

        // update
        writeln!(routes, "\n\n@app.put(\"/{collection}/{{{snake}_id}}\")")?;
        writeln!(routes, "def update_{snake}({snake}_id: int, {snake}: {class}):")?;
        writeln!(routes, "    if {snake}_id not in {collection}_db:")?;
        writeln!(routes, "        raise _fastapi.HTTPException(status_code=404, detail=\"{class} not found\")")?;
        writeln!(routes, "    {collection}_db[{snake}_id] = {snake}")?;
        writeln!(routes, "    return {{\"id\": {snake}_id, **{snake}.model_dump()}}")?;

        // delete
        writeln!(routes, "\n\n@app.delete(\"/{collection}/{{{snake}_id}}\", status_code=204)")?;
        writeln!(routes, "def delete_{snake}({snake}_id: int):")?;
        writeln!(routes, "    if {collection}_db.pop({snake}_id, None) is None:")?;
        writeln!(routes, "        raise _fastapi.HTTPException(status_code=404, detail=\"{class} not found\")")?;

        Ok(routes)
    }
}
