// Prompt templates for the advisory tasks.
// Placeholders use {name} syntax and are filled by `fill`.

pub const RESUME_ANALYSIS: &str = r#"You are an expert career counselor analyzing resumes.
Analyze the following resume for the target role of {target_role}.

Resume:
{resume_text}

Respond with a JSON object in exactly this shape:
{
  "skills_found": ["skill1", "skill2"],
  "experience_years": 0,
  "education": "degree details",
  "match_score": 75,
  "strengths": ["strength1", "strength2"],
  "weaknesses": ["weakness1", "weakness2"],
  "recommendations": ["rec1", "rec2"],
  "summary": "Brief professional summary"
}"#;

pub const SKILL_GAP: &str = r#"You are a career advisor. Analyze the skill gap for a student targeting the role of {target_role}.

Current skills: {skills}
{student_info}

Respond with a JSON object in exactly this shape:
{
  "missing_skills": ["skill1", "skill2"],
  "skills_to_improve": ["skill1", "skill2"],
  "learning_path": [
    {"skill": "skill_name", "resource": "resource_name", "duration": "2 weeks", "priority": "high"}
  ],
  "estimated_time_to_ready": "3-6 months",
  "match_percentage": 60,
  "recommendations": ["rec1", "rec2"]
}"#;

pub const SALARY_PREDICTION: &str = r#"You are a salary prediction expert for fresh graduates in India.
Based on the candidate profile, predict a realistic salary range.

CGPA: {cgpa}
Skills: {skills}
Number of projects: {projects}
Internships: {internships}
Branch: {branch}

Respond with a JSON object in exactly this shape:
{
  "predicted_min_lpa": 4.5,
  "predicted_max_lpa": 8.0,
  "predicted_avg_lpa": 6.0,
  "confidence": "medium",
  "factors": [
    {"factor": "CGPA", "impact": "positive", "detail": "Above average CGPA"},
    {"factor": "Skills", "impact": "positive", "detail": "In-demand technology stack"}
  ],
  "recommendations_to_increase": ["Learn cloud computing", "Get AWS certification"],
  "market_insight": "Brief market insight for this profile"
}"#;

pub const ROADMAP: &str = r#"You are a career counselor creating a personalized 6-month roadmap for a student.

Student profile:
- Name: {name}
- Branch: {branch}
- CGPA: {cgpa}
- Current skills: {skills}
- Projects: {projects}
- Internships: {internships}
{target_package}

Career goal: {career_goal}

Create a month-by-month plan with six entries. Respond with a JSON object in exactly this shape:
{
  "career_goal": "{career_goal}",
  "current_readiness": 45,
  "months": [
    {
      "month": 1,
      "title": "Foundation Building",
      "focus_areas": ["area1", "area2"],
      "skills_to_learn": ["skill1", "skill2"],
      "projects": ["project1"],
      "certifications": ["cert1"],
      "milestones": ["milestone1"]
    }
  ],
  "resources": ["resource1", "resource2"],
  "tips": ["tip1", "tip2"]
}"#;

pub const CHAT_SYSTEM: &str = "You are a placement assistant for a college. Help students with \
    career guidance, interview preparation, resume tips, salary negotiation, and \
    placement-related queries. Be helpful, encouraging, and specific. Keep responses concise \
    but informative.";

/// Substitutes every `{key}` in `template` with its value.
pub fn fill(template: &str, vars: &[(&str, String)]) -> String {
    vars.iter().fold(template.to_string(), |text, (key, value)| {
        text.replace(&format!("{{{key}}}"), value)
    })
}
