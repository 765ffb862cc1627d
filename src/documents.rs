use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::DocumentData;

/// Current on-disk schema version for the document blob.
const SCHEMA_VERSION: u32 = 1;

/// The three documents persisted as a single versioned JSON blob.
///
/// Reads fall back to the built-in defaults when the file is missing or
/// unreadable; an unversioned blob from the old web app is migrated on load.
pub struct DocumentStore {
    path: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct VersionedBlob {
    version: u32,
    requirements: String,
    nutrition_info: String,
    history: String,
}

/// Pre-versioning shape, camelCase keys as written by the browser client.
#[derive(Deserialize)]
struct LegacyBlob {
    requirements: String,
    #[serde(rename = "nutritionInfo")]
    nutrition_info: String,
    history: String,
}

impl DocumentStore {
    pub fn new(path: PathBuf) -> Self {
        DocumentStore { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the documents, falling back to defaults when nothing usable
    /// is on disk.
    pub fn load(&self) -> DocumentData {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => parse_blob(&content).unwrap_or_else(default_documents),
            Err(_) => default_documents(),
        }
    }

    pub fn save(&self, documents: &DocumentData) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create data directory")?;
        }

        let blob = VersionedBlob {
            version: SCHEMA_VERSION,
            requirements: documents.requirements.clone(),
            nutrition_info: documents.nutrition_info.clone(),
            history: documents.history.clone(),
        };
        let content = serde_json::to_string_pretty(&blob)
            .context("Failed to serialize documents")?;
        std::fs::write(&self.path, content)
            .context("Failed to write documents file")?;

        Ok(())
    }
}

fn parse_blob(content: &str) -> Option<DocumentData> {
    if let Ok(blob) = serde_json::from_str::<VersionedBlob>(content) {
        return Some(DocumentData {
            requirements: blob.requirements,
            nutrition_info: blob.nutrition_info,
            history: blob.history,
        });
    }

    // Unversioned blob from the old web client.
    serde_json::from_str::<LegacyBlob>(content)
        .ok()
        .map(|blob| DocumentData {
            requirements: blob.requirements,
            nutrition_info: blob.nutrition_info,
            history: blob.history,
        })
}

/// Built-in defaults used on first run and when the blob is unreadable.
pub fn default_documents() -> DocumentData {
    DocumentData {
        requirements: DEFAULT_REQUIREMENTS.trim().to_string(),
        nutrition_info: DEFAULT_NUTRITION.trim().to_string(),
        history: DEFAULT_HISTORY.trim().to_string(),
    }
}

const DEFAULT_REQUIREMENTS: &str = r#"
**Ingredienser:**
- Der må ikke indgå stærkt forarbejdede fødevarer.
- Råvarer skal være hele og uprocesserede.
- Der skal kun bruges ekstra jomfru olivenolie, hvis der skal bruges olier.
- Ingen light produkter
- Intet raffineret sukker
- Retterne må ikke indeholde oksekød eller lammekød.

**Næringsværdier:**
- Kulhydratindtaget skal skal være lavt.
- Kulhydrater fra brød, pasta og ris skal minimeres. Og hvis det er med er det kun fuldkorn.
- Prioriter sunde fedtstoffer (eksempelvis olivenolie, avocado, nødder, fede fisk og smør)
- Prioriter protein af høj kvalitet (æg, fisk, kød, fjerkræ, evt mejeriprodukter af god kvalitet)
- Vælg primært grøntsager med lavt glykæmisk indhold
- Alle familiemedlemmer skal have tilstrækkeligt af Vitamin A, vitamin B, vitamin C, vitamin D og vitamin E set over hele ugen.
- Ost må maks. udgøre 10% af kalorierne og bruges maks. 2 gange pr. uge.

**Smag og måltidssammensætning**
- Det skal være varierede retter fra mange forskellige køkkener.
- Der må gerne være masser af smag i retterne - dvs ikke nødvendigvis børnevenligt.
- Der skal være stor variation i de forskellige retter.
- Mindst 1 ret hver uge skal komme fra enten det indiske, mellemøstlige eller sydøstasiatiske køkken.
- Hvert måltid skal helst bestå af minimum 3 dele: et hovedelement (ofte noget kød eller fisk) og noget tilbehør (ofte lidt grovere grøntsager, det kunne være kartofler, rodfrugter, ris, pasta eller lignende) og en salat eller anden sidedish. Derunder kan de enkelte måltider også indeholde dressinger eller andet tilbehør.
- Hovedelementet af retten, må ikke være en del af madplanen for de seneste 2 måneder.

**Praktik:**
- Råvarer skal i videst muligt omfang være tilgængelige i almindelige supermarkeder.
- Hvis jeg har mindre end 10 minutter til at lave mad en dag, så skal denne dags ret være rester fra en af de foregående dage. Hvis dette ikke er muligt, lav da en ret som kan laves på maks 10 minutter.
- Følgende råvarer er basisvarer og skal ikke skrives på indkøbslisten: Olie, eddike, salt, peber, tørrede krydderier, mayonnaise, bouillon, sennep, ketchup, remoulade.

**Andet:**
- Det skal være klimavenligt.
- Råvarer skal være sæsonbestemte.
"#;

const DEFAULT_NUTRITION: &str = r#"
| Medlem | Alder/Årgang | Køn    | Kropsvægt (kg) | Kalorier  | Protein (g) | Fibre (g) | Grøntsager (g) | Sunde fedtstoffer (g) | Omega-3 (g) | Vitamin A (µg) | Vitamin C (mg) | Vitamin D (µg) | Vitamin E (mg) | Calcium (mg) | Jern (mg) | Magnesium (mg) | Kalium (mg)  | B-12 vitamin |
| :----- | :----------- | :----- | :------------- | :-------- | :---------- | :-------- | :------------- | :-------------------- | :---------- | :------------- | :------------- | :------------- | :------------- | :----------- | :-------- | :------------- | :----------- | :----------- |
| Thor   | 1982         | Mand   | 80             | 700-900   | 50-55       | 12        | 250-300        | 15-20                 | 1.5-2       | 350-500        | 40-60          | 5-7            | 4-6            | 300-400      | 4-6       | 120-150        | 1500-2000    | 1.5-2        |
| Line   | 1982         | Kvinde | 55             | 500-700   | 35-40       | 12        | 250-300        | 15-20                 | 1.5-2       | 350-500        | 40-60          | 5-7            | 4-6            | 300-400      | 4-6       | 120-150        | 1500-2000    | 1.5-2        |
| Vigga  | 2009         | Pige   | 55             | 500-700   | 35-40       | 10        | 200-250        | 12-15                 | 1.2-1.5     | 300-400        | 30-50          | 5-7            | 4-6            | 300-400      | 3-5       | 100-130        | 1300-1700    | 1.5-2        |
| Harry  | 2013         | Dreng  | 35             | 400-600   | 20-25       | 8         | 200-250        | 10-15                 | 1-1.5       | 300-400        | 30-50          | 5-7            | 3-5            | 300-400      | 3-5       | 100-130        | 1300-1700    | 1-1.5        |
| Yrsa   | 2016         | Pige   | 30             | 300-500   | 18-22       | 6         | 150-200        | 8-12                  | 0.8-1.2     | 250-350        | 25-40          | 5-7            | 3-4            | 250-350      | 2.5-4     | 80-110         | 1100-1500    | 1-1.5        |
"#;

const DEFAULT_HISTORY: &str = r#"
- Uge 34: Kylling i karry, Lasagne med spinat
- Uge 33: Fiskefrikadeller med rugbrød, Boller i karry
- Uge 32: Wok med kylling og grøntsager, Hjemmelavet pizza
- Uge 31: Tortillas med hakket svinekød, Mørbradbøffer med bløde løg
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> DocumentStore {
        let path = std::env::temp_dir()
            .join("madplan-tests")
            .join(format!("{}-{}.json", name, std::process::id()));
        let _ = std::fs::remove_file(&path);
        DocumentStore::new(path)
    }

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let store = temp_store("missing");
        assert_eq!(store.load(), default_documents());
    }

    #[test]
    fn test_save_and_reload() {
        let store = temp_store("roundtrip");
        let mut docs = default_documents();
        docs.history = "- Uge 35: Dahl med linser".to_string();

        store.save(&docs).unwrap();
        assert_eq!(store.load(), docs);
    }

    #[test]
    fn test_corrupt_blob_falls_back_to_defaults() {
        let store = temp_store("corrupt");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ not json").unwrap();
        assert_eq!(store.load(), default_documents());
    }

    #[test]
    fn test_legacy_blob_is_migrated() {
        let legacy = r#"{
            "requirements": "krav",
            "nutritionInfo": "tabel",
            "history": "- Uge 30: Suppe"
        }"#;
        let docs = parse_blob(legacy).unwrap();
        assert_eq!(docs.requirements, "krav");
        assert_eq!(docs.nutrition_info, "tabel");
        assert_eq!(docs.history, "- Uge 30: Suppe");
    }

    #[test]
    fn test_versioned_blob_parses() {
        let versioned = r#"{
            "version": 1,
            "requirements": "a",
            "nutrition_info": "b",
            "history": "c"
        }"#;
        let docs = parse_blob(versioned).unwrap();
        assert_eq!(docs.nutrition_info, "b");
    }
}
