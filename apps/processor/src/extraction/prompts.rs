// Alumni extraction prompt templates.
// Placeholders are substituted with `str::replace` in extraction::ai.

pub const EXTRACTION_PROMPT_TEMPLATE: &str = r#"You are an expert data extraction system for the IIIT Naya Raipur alumni database.

CRITICAL CONTEXT:
- IIIT Naya Raipur (IIIT-NR) was established in {founding_year}
- Valid branches: CSE, ECE, DSAI, Mechanical, Civil, Other
- We need: batch (start year), graduation year, branch, current company

RAW LINKEDIN DATA:
{raw_json}

PROJECTS SUMMARY (for skill inference only - DO NOT include in output):
{projects_summary}

EXTRACTION RULES:
1. Batch & graduation year: use the FIRST education entry whose title names the institute
   ({institution_variants}) AND whose degree is a bachelor/master/doctoral degree.
   - batch = start_year as a STRING, graduationYear = end_year as a STRING
   - Both must be >= {founding_year}; otherwise use null
2. Branch, from the field of study of that same education entry, first rule that applies:
   - "Computer Science", "CS", "CSE" -> "CSE"
   - "Electronics" and "Communication", "ECE", "E&C" -> "ECE"
   - "Data Science", "AI", "DSAI" -> "DSAI"
   - otherwise "CSE"
3. Current company: from the current_company object when it has a name. If that object is
   missing, use the FIRST experience entry whose end_date is "Present" (company as name,
   title as title). Otherwise null.
4. Experience flattening: when an experience has a nested "positions" array, emit EVERY
   position as its own experience entry, copying company, company_id, company_logo_url
   and url from the parent, and using the position's "meta" as "duration".
   Every emitted entry must have "positions": [].
5. Skills: infer from job titles first (about 70% of the signal) and projects second
   (about 30%). Split into:
   - technical: languages, frameworks, domains (Python, React, Machine Learning, IoT)
   - tools: concrete tools and platforms (Git, Docker, Arduino, TensorFlow, Excel, SQL)
   Examples:
   - "Business Analyst" -> technical ["Data Analytics", "Business Analysis"], tools ["SQL", "Excel"]
   - "Software Engineer" -> technical ["Software Development", "Programming"], tools ["Git"]
   - "Senior Data Scientist" -> technical ["Machine Learning", "Data Science", "Python"], tools ["TensorFlow", "scikit-learn"]
   Use null for skills when nothing can be inferred.
6. Report your own certainty as extraction_confidence between 0.0 and 1.0.

OUTPUT SCHEMA (return exactly this structure):
{
  "id": "string",
  "linkedin_id": "string",
  "name": "string",
  "first_name": "string" | null,
  "last_name": "string" | null,
  "batch": "string" | null,
  "branch": "CSE" | "ECE" | "DSAI" | "Mechanical" | "Civil" | "Other",
  "graduationYear": "string" | null,
  "city": "string" | null,
  "country_code": "string" | null,
  "position": "string" | null,
  "current_company": {"name": "string", "company_id": "string" | null, "title": "string" | null, "location": "string" | null} | null,
  "location": "string" | null,
  "avatar": "string" | null,
  "about": "string" | null,
  "education": [{"title": "string", "degree": "string", "field": "string" | null, "start_year": "string" | null, "end_year": "string" | null, "url": "string" | null, "institute_logo_url": "string" | null}],
  "experience": [{"title": "string", "company": "string", "company_id": "string" | null, "company_logo_url": "string" | null, "location": "string" | null, "start_date": "string" | null, "end_date": "string" | null, "duration": "string" | null, "url": "string" | null, "positions": []}],
  "skills": {"technical": ["string"], "tools": ["string"]} | null,
  "url": "string",
  "input_url": "string" | null,
  "followers": number | null,
  "connections": number | null,
  "current_company_company_id": "string" | null,
  "current_company_name": "string" | null,
  "educations_details": "string" | null,
  "linkedin_num_id": "string" | null,
  "banner_image": "string" | null,
  "timestamp": "ISO 8601 datetime" | null,
  "extraction_confidence": number
}

Return ONLY the JSON object, nothing else, no code fences. batch and graduationYear must be strings."#;

/// Shown in place of the project list when the profile has none.
pub const NO_PROJECTS: &str = "No projects available";
