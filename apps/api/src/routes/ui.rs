use axum::response::Html;

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Resume Evaluator</title>
</head>
<body>
  <h1>Resume Evaluator</h1>
  <h2>Evaluate Resume Against a Job Description</h2>
  <form id="evaluate" action="/api/v1/evaluations" method="post" enctype="multipart/form-data">
    <p><label>Job Description:<br><textarea name="job_description" rows="12" cols="80"></textarea></label></p>
    <p><label>Upload Your Resume (PDF or DOCX)...<br>
      <input type="file" name="resume" accept=".pdf,.docx,application/pdf,application/vnd.openxmlformats-officedocument.wordprocessingml.document">
    </label></p>
    <p><button type="submit">Evaluate Resume</button> <span id="status"></span></p>
  </form>
  <h3>Match Percentage:</h3>
  <pre id="match"></pre>
  <h3>Missing Keywords:</h3>
  <pre id="missing"></pre>
  <script>
    const form = document.getElementById("evaluate");
    form.addEventListener("submit", async (event) => {
      event.preventDefault();
      const status = document.getElementById("status");
      status.textContent = "Analyzing...";
      document.getElementById("match").textContent = "";
      document.getElementById("missing").textContent = "";
      const response = await fetch(form.action, { method: "POST", body: new FormData(form) });
      const body = await response.json();
      if (response.ok) {
        status.textContent = "";
        document.getElementById("match").textContent = body.match_percentage;
        document.getElementById("missing").textContent = body.missing_keywords;
      } else {
        status.textContent = body.error.message;
      }
    });
  </script>
</body>
</html>
"#;

/// GET /
/// Serves the single-page evaluation form.
pub async fn index_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}
