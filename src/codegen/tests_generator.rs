// pytest suite generator (tests/test_main.py)
use std::fmt::Write;
use crate::error::AppResult;
use crate::schema::{EntitySchema, GenerationRequest};
use super::utils::{self, EntityNames};

pub struct TestsGenerator<'a> {
    request: &'a GenerationRequest,
}

impl<'a> TestsGenerator<'a> {
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self { request }
    }

    pub fn generate_tests(&self) -> AppResult<String> {
        let mut content = utils::generate_file_header();
        content.push_str("from fastapi.testclient import TestClient\n\n");
        content.push_str("from app.main import app\n\n");
        content.push_str("client = TestClient(app)\n");

        for entity in &self.request.entities {
            content.push_str(&self.generate_crud_test(entity)?);
        }

        Ok(content)
    }

    /// Sample payload as a Python dict literal, one key per field
    fn sample_payload(&self, entity: &EntitySchema) -> String {
        let pairs: Vec<String> = entity
            .fields
            .iter()
            .map(|field| {
                format!(
                    "{}: {}",
                    utils::python_string(&field.name),
                    utils::sample_value(field.field_type)
                )
            })
            .collect();
        format!("{{{}}}", pairs.join(", "))
    }

    /// Walk one record through create, list, get, update and delete
    fn generate_crud_test(&self, entity: &EntitySchema) -> AppResult<String> {
        let EntityNames { snake, collection, .. } = EntityNames::for_entity(entity);
        let payload = self.sample_payload(entity);
        let mut test = String::new();

        writeln!(test, "\n\ndef test_{snake}_crud():")?;
        writeln!(test, "    payload = {payload}\n")?;

        writeln!(test, "    response = client.post(\"/{collection}\", json=payload)")?;
        writeln!(test, "    assert response.status_code == 201")?;
        writeln!(test, "    created = response.json()")?;
        writeln!(test, "    {snake}_id = created[\"id\"]")?;
        writeln!(test, "    for key, value in payload.items():")?;
        writeln!(test, "        assert created[key] == value\n")?;

        writeln!(test, "    response = client.get(\"/{collection}\")")?;
        writeln!(test, "    assert response.status_code == 200")?;
        writeln!(test, "    assert any(item[\"id\"] == {snake}_id for item in response.json())\n")?;

        writeln!(test, "    response = client.get(f\"/{collection}/{{{snake}_id}}\")")?;
        writeln!(test, "    assert response.status_code == 200\n")?;

        writeln!(test, "    response = client.put(f\"/{collection}/{{{snake}_id}}\", json=payload)")?;
        writeln!(test, "    assert response.status_code == 200\n")?;

        writeln!(test, "    response = client.delete(f\"/{collection}/{{{snake}_id}}\")")?;
        writeln!(test, "    assert response.status_code == 204\n")?;

        writeln!(test, "    response = client.get(f\"/{collection}/{{{snake}_id}}\")")?;
        writeln!(test, "    assert response.status_code == 404")?;

        Ok(test)
    }
}
