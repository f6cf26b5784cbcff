#![allow(dead_code)]

use course_core::model::{CourseCatalog, ExamCatalog};

pub const CATALOG_JSON: &str = r#"{
    "sections": [
        {
            "title": "Course Introduction",
            "items": [
                { "title": "Introduction Video", "kind": "video", "source": "/video/video.mp4", "thumbnail": "/video/thumbnail.jpg" },
                { "title": "Course Overview PDF", "kind": "document", "source": "https://example.com/dummy.pdf" },
                { "title": "Course Quiz", "kind": "exam", "exam_id": "course-quiz", "question_count": 5, "duration_minutes": 1 },
                { "title": "Follow-up Video", "kind": "video", "source": "/video/video.mp4" }
            ]
        },
        {
            "title": "JavaScript Language Basics",
            "items": [
                { "title": "Defining Functions", "kind": "video", "source": "/video/video.mp4" },
                { "title": "Functions Quiz", "kind": "exam", "exam_id": "functions-quiz", "question_count": 2, "duration_minutes": 5 }
            ]
        }
    ]
}"#;

pub const EXAMS_JSON: &str = r#"[
    {
        "id": "course-quiz",
        "title": "Course Quiz",
        "duration_minutes": 1,
        "questions": [
            { "id": 1, "prompt": "Oldest rock formations?", "options": ["Assam", "Bihar", "Karnataka", "Uttar Pradesh"], "correct_answer": 1 },
            { "id": 2, "prompt": "Capital of France?", "options": ["London", "Berlin", "Paris", "Madrid"], "correct_answer": 2 },
            { "id": 3, "prompt": "Red Planet?", "options": ["Venus", "Mars", "Jupiter", "Saturn"], "correct_answer": 1 },
            { "id": 4, "prompt": "Largest ocean?", "options": ["Atlantic", "Indian", "Arctic", "Pacific"], "correct_answer": 3 },
            { "id": 5, "prompt": "Romeo and Juliet?", "options": ["Dickens", "Shakespeare", "Austen", "Twain"], "correct_answer": 1 }
        ]
    },
    {
        "id": "functions-quiz",
        "title": "Functions Quiz",
        "duration_minutes": 5,
        "questions": [
            { "id": 1, "prompt": "Declare a function?", "options": ["function = f() {}", "function f() {}"], "correct_answer": 1 },
            { "id": 2, "prompt": "Call a function?", "options": ["call f()", "f()"], "correct_answer": 1 }
        ]
    }
]"#;

/// Correct option per question of `course-quiz`.
pub const COURSE_QUIZ_KEY: [usize; 5] = [1, 2, 1, 3, 1];

pub fn content() -> (CourseCatalog, ExamCatalog) {
    services::load_content(CATALOG_JSON, EXAMS_JSON).expect("sample content")
}

/// Let spawned tasks run on the current-thread test runtime.
pub async fn settle() {
    for _ in 0..50 {
        tokio::task::yield_now().await;
    }
}
