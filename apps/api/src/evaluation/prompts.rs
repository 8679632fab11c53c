// All LLM prompt templates for the Evaluation module.
// Placeholders: {job_description}, {resume_text}. Rendered by builder::fill_template.

/// Match-evaluation prompt. Asks for a percentage plus a short breakdown.
pub const MATCH_EVALUATION_TEMPLATE: &str = r#"You are an experienced ATS (Applicant Tracking System) expert. Your task is to evaluate the following resume against the job description.
Calculate the percentage match between the two, considering skills, experience, and qualifications. Assign weights to the skills based on their importance as stated in the job description: mandatory or emphasized skills get a higher weight than nice-to-have skills.

Job Description:
{job_description}

Resume:
{resume_text}

Respond in under 300 words using this structure:
Match Percentage: <number>%
Skills: <one or two sentences>
Experience: <one or two sentences>
Qualifications: <one or two sentences>
Overall: <one or two sentences>"#;

/// Missing-keywords prompt. Asks for a list of gaps relative to the job description.
pub const MISSING_KEYWORDS_TEMPLATE: &str = r#"You are an experienced recruiter. Based on the following job description and resume, identify the skills, qualifications, and keywords that the job description asks for but the resume does not show.

Job Description:
{job_description}

Resume:
{resume_text}

Respond in under 200 words with a bulleted list of missing keywords, most important first. If nothing is missing, say so in one sentence."#;
