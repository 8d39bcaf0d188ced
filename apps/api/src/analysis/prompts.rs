// Prompt templates for the analysis orchestrator.
// Placeholders are filled by `llm_client::prompts::fill_template`.

/// Replace: {resume_text}, {json_only}
pub const EXTRACT_RESUME_TEMPLATE: &str = r#"Extract the following information from this resume:
- Full name
- Email
- Phone number
- LinkedIn profile (if available)
- Education (institution, degree, field, start date, end date)
- Experience (company, role, start date, end date, description)
- Skills
- Certifications (name, issuer, date)

Use this JSON structure. Omit a field or leave a list empty when the resume does not mention it:
{
  "name": string,
  "email": string,
  "phone": string,
  "linkedin": string,
  "education": [
    {"institution": string, "degree": string, "field": string, "startDate": string, "endDate": string}
  ],
  "experience": [
    {"company": string, "role": string, "startDate": string, "endDate": string, "description": string}
  ],
  "skills": [string],
  "certifications": [
    {"name": string, "issuer": string, "date": string}
  ]
}

Resume text:
{resume_text}

{json_only}"#;

/// Replace: {resume_json}, {job_description}, {json_only}
pub const SCORE_FIT_TEMPLATE: &str = r#"Compare this candidate's resume information with the job description.
Provide a match score from 0-100 and a detailed explanation of the fit.
Also identify any red flags or concerns.

Resume information:
{resume_json}

Job description:
{job_description}

Return the result as a JSON object with the following structure:
{
  "score": number,
  "analysis": string,
  "strengths": [string],
  "weaknesses": [string],
  "redFlags": [string],
  "recommendedQuestions": [string]
}

{json_only}"#;

/// Replace: {resume_json}, {json_only}
pub const RED_FLAGS_TEMPLATE: &str = r#"Analyze this resume information and identify potential red flags, such as:
- Inconsistencies in timeline
- Gaps in employment
- Lack of specific skills for claimed roles
- Vague descriptions
- Frequent job changes without clear progression

Resume information:
{resume_json}

Return the results as a JSON object with the following structure:
{
  "redFlags": [
    {
      "type": string,
      "description": string,
      "severity": "low" | "medium" | "high"
    }
  ],
  "summary": string
}

{json_only}"#;

/// Replace: {question_count}, {resume_json}, {job_description}, {json_only}
pub const INTERVIEW_QUESTIONS_TEMPLATE: &str = r#"Generate {question_count} tailored interview questions for this candidate based on their resume and the job description.
Include both technical and behavioral questions relevant to the role.

Resume information:
{resume_json}

Job description:
{job_description}

Return the results as a JSON array of objects with the following structure:
[
  {
    "question": string,
    "rationale": string,
    "category": "technical" | "behavioral" | "experience"
  }
]

{json_only}"#;

/// How many questions the prompt asks for. The model may return a different count.
pub const INTERVIEW_QUESTION_COUNT: usize = 5;
