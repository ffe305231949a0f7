//! Instruction template sent to the completion service.

use crate::identity::Role;

/// Everything the prompt depends on. Nothing else leaks in (no clock, no
/// randomness), so identical inputs always render an identical prompt.
#[derive(Debug, Clone, Copy)]
pub struct PromptInput<'a> {
    pub username: &'a str,
    pub role: Role,
    pub message: &'a str,
    /// Schema snapshot serialized with [`crate::SchemaSnapshot::to_prompt_json`].
    pub schema_json: &'a str,
    pub max_values_per_statement: usize,
}

#[must_use]
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let admin = if input.role.is_admin() { "ya" } else { "tidak" };
    let max_values = input.max_values_per_statement;
    format!(
        r#"Kamu adalah AI yang hanya menjawab dalam format JSON valid. Jangan memberikan penjelasan di luar struktur JSON.

Format jawaban wajib:
{{
  "explain": "penjelasan singkat dalam bahasa manusia (tanpa menyebut bentuk SQL, query, atau script secara eksplisit)",
  "sql_script": "query SQL yang dihasilkan atau null jika tidak relevan"
}}

Data pendukung:
- Nama Pengguna: {username}
- Pengguna adalah admin: {admin}
- Pesan User: {message}
- Struktur Tabel: {schema}
- Untuk permintaan yang memodifikasi data (INSERT, UPDATE, DELETE):
  • jika pengguna adalah admin, jalankan sesuai aturan normal.
  • jika pengguna bukan admin:
      - "sql_script" harus diisi null
      - "explain" jelaskan secara singkat bahwa pengguna tidak memiliki izin sebagai admin.
- Jangan sebutkan detail struktur tabel di "explain".
- Jangan berikan perintah yang mengubah data ketika pengguna bukan admin.

Aturan ketat pembuatan query:
1. Semua jawaban harus exactly JSON valid tanpa karakter tambahan di luar JSON (tidak boleh markdown, tidak boleh text lain).
2. Bagian "explain":
  - jelaskan manfaat logis dari hasil perintah dalam bahasa manusia.
  - dilarang menyebut kata "SQL", "query", "script", atau format bahasa pemrograman apapun.
  - jelaskan hanya konteks tujuan, bukan menulis kode.
3. Bagian "sql_script":
  - jika menghasilkan perintah database, tulis di sini.
  - jika tidak relevan dengan data tabel atau perintah tidak masuk akal, isi null.
4. Untuk INSERT/UPDATE:
  - jika terdapat lebih dari {max_values} values dalam satu perintah, pecah menjadi beberapa perintah terpisah.
  - maksimal {max_values} values setiap perintah.
  - urutan, data, dan kolom harus tetap sama.
5. Jika input user di luar konteks tabel:
  - "explain" jelaskan secara netral bahwa permintaan tidak terkait data.
  - "sql_script": null.
6. Tidak boleh memberikan penjelasan di luar JSON atau memaparkan perintah database di bagian "explain".
7. Jangan pernah memberikan saran atau detail teknis dalam teks bebas."#,
        username = input.username,
        message = input.message,
        schema = input.schema_json,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(role: Role) -> PromptInput<'static> {
        PromptInput {
            username: "budi",
            role,
            message: "tampilkan semua barang",
            schema_json: r#"[{"name":"inventory","columns":[]}]"#,
            max_values_per_statement: 3,
        }
    }

    #[test]
    fn test_build_prompt_is_deterministic() {
        assert_eq!(build_prompt(&input(Role::Member)), build_prompt(&input(Role::Member)));
    }

    #[test]
    fn test_build_prompt_embeds_inputs() {
        let prompt = build_prompt(&input(Role::Member));
        assert!(prompt.contains("- Nama Pengguna: budi"));
        assert!(prompt.contains("- Pesan User: tampilkan semua barang"));
        assert!(prompt.contains(r#"- Struktur Tabel: [{"name":"inventory","columns":[]}]"#));
        assert!(prompt.contains("- Pengguna adalah admin: tidak"));
        assert!(prompt.contains("maksimal 3 values setiap perintah"));
        assert!(prompt.contains(r#""sql_script": null"#));
    }

    #[test]
    fn test_build_prompt_reflects_role_and_limit() {
        let mut admin = input(Role::Admin);
        admin.max_values_per_statement = 5;
        let prompt = build_prompt(&admin);
        assert!(prompt.contains("- Pengguna adalah admin: ya"));
        assert!(prompt.contains("lebih dari 5 values"));
        assert_ne!(prompt, build_prompt(&input(Role::Admin)));
    }
}
