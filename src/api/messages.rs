//! User-facing message catalog.
//!
//! Responses speak Indonesian to match the platform's audience; token errors
//! stay in English because API clients match on them.

pub(crate) const NO_TOKEN: &str = "Access denied. No token provided.";
pub(crate) const INVALID_TOKEN: &str = "Invalid token.";
pub(crate) const INVALID_TOKEN_USER: &str = "Invalid token. User not found.";

pub(crate) const STUDENT_ONLY_PROGRESS: &str =
    "Hanya siswa yang dapat memperbarui progres pelajaran";

pub(crate) const SERVER_ERROR: &str = "Terjadi kesalahan server";

pub(crate) const REGISTER_FIELDS_REQUIRED: &str = "Semua field wajib diisi";
pub(crate) const USER_TYPE_MISSING: &str = "Tipe pengguna tidak diberikan";
pub(crate) const USER_TYPE_INVALID: &str = "Tipe pengguna tidak valid";
pub(crate) const PASSWORD_TOO_SHORT: &str = "Password minimal 8 karakter";
pub(crate) const EMAIL_TAKEN: &str = "Email sudah terdaftar";
pub(crate) const REGISTER_OK: &str = "Registrasi berhasil, silahkan login";
pub(crate) const BAD_CREDENTIALS: &str = "Email atau password salah";
pub(crate) const ACCOUNT_INACTIVE: &str = "Akun Anda tidak aktif";
pub(crate) const LOGIN_OK: &str = "Login berhasil";

pub(crate) const LESSON_NOT_FOUND: &str = "Pelajaran tidak ditemukan";
pub(crate) const LESSON_OK: &str = "Pelajaran berhasil diambil";
pub(crate) const LESSON_VIEW_FORBIDDEN: &str = "Anda tidak memiliki akses ke pelajaran ini";
pub(crate) const NOT_ENROLLED: &str = "Anda belum terdaftar di kursus ini";
pub(crate) const PROGRESS_OK: &str = "Progres berhasil diperbarui";

pub(crate) const QUIZ_NOT_FOUND: &str = "Quiz tidak ditemukan";
pub(crate) const QUIZ_CREATE_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk menambah quiz di pelajaran ini";
pub(crate) const QUIZ_UPDATE_FORBIDDEN: &str = "Anda tidak memiliki akses untuk mengubah quiz ini";
pub(crate) const QUIZ_DELETE_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk menghapus quiz ini";
pub(crate) const QUIZ_VIEW_FORBIDDEN: &str = "Anda tidak memiliki akses untuk melihat quiz ini";
pub(crate) const QUIZ_CREATED: &str = "Quiz berhasil dibuat";
pub(crate) const QUIZ_UPDATED: &str = "Quiz berhasil diperbarui";
pub(crate) const QUIZ_DELETED: &str = "Quiz berhasil dihapus";
pub(crate) const QUIZ_DETAIL_OK: &str = "Detail quiz berhasil diambil";
pub(crate) const QUIZ_OK: &str = "Quiz berhasil diambil";

pub(crate) const QUIZ_HAS_NO_QUESTIONS: &str = "Quiz ini tidak memiliki pertanyaan";
pub(crate) const QUIZ_PASSED: &str = "Selamat! Anda lulus quiz ini";
pub(crate) const QUIZ_FAILED: &str = "Anda belum lulus quiz ini";
pub(crate) const NO_ATTEMPTS: &str = "Anda belum pernah mengerjakan quiz ini";
pub(crate) const RESULTS_OK: &str = "Hasil quiz berhasil diambil";

pub(crate) const ASSIGNMENT_NOT_FOUND: &str = "Tugas tidak ditemukan";
pub(crate) const ASSIGNMENT_CREATE_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk menambah tugas di pelajaran ini";
pub(crate) const ASSIGNMENT_UPDATE_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk mengubah tugas ini";
pub(crate) const ASSIGNMENT_DELETE_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk menghapus tugas ini";
pub(crate) const SUBMISSIONS_VIEW_FORBIDDEN: &str =
    "Anda tidak memiliki akses untuk melihat pengumpulan tugas ini";
pub(crate) const ASSIGNMENT_CREATED: &str = "Tugas berhasil dibuat";
pub(crate) const ASSIGNMENT_UPDATED: &str = "Tugas berhasil diperbarui";
pub(crate) const ASSIGNMENT_DELETED: &str = "Tugas berhasil dihapus";
pub(crate) const SUBMISSIONS_OK: &str = "Daftar pengumpulan tugas berhasil diambil";
pub(crate) const SUBMISSION_CREATED: &str = "Tugas berhasil dikumpulkan";

pub(crate) fn invalid_question(index: usize) -> String {
    format!("Pertanyaan #{index} tidak valid. Teks pertanyaan dan array opsi wajib diisi")
}

pub(crate) fn invalid_option(option_index: usize, question_index: usize) -> String {
    format!("Opsi #{option_index} untuk pertanyaan #{question_index} tidak valid. Teks opsi wajib diisi")
}
