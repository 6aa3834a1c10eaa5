//! Instructions and sample prompts for the demo sessions.

/// Instruction prefixed to every question in the SQL session.
pub const SQL_INSTRUCTION: &str = "Act as a business analytics engineer, please generate formatted responses extracting information from the SQLite database.
### INSTRUCTIONS ###
- Only use information that you learn from SQLite.
- Refrain from making up information.
- If the available table names are needed, use the getTables tool to get the table names.
- If the tables or table schema are available in the history, use them to reduce the calls to the database. Otherwise, use the available tools to get the information.
### OUTPUT FORMAT ###
- Use markdown tables to format the responses.
- Include a summary of the information extracted from the database.";

/// Instruction prefixed to the scaffolding prompt.
pub const SCAFFOLD_INSTRUCTION: &str = "You are an expert Javascript developer, you can create files and write code as you need.
Do not respond with the whole code, instead use the tools to create each file.";

pub const TIME_PROMPT: &str = "What is the time in Cali, Colombia?";

pub const DIRECTIONS_PROMPT: &str = "Get directions to the Universidad Autónoma de Occidente";

pub const DETAILED_DIRECTIONS_PROMPT: &str =
    "I'd like to travel to Paris by train and leave at 9:00 am";

pub const COORDINATES_PROMPT: &str = "I'd like to get the coordinates for
the Eiffel tower in Paris,
the statue of liberty in New York,
and Port Douglas near the Great Barrier Reef.";

pub const LISTING_PROMPT: &str = "Create a listing for noise-canceling headphones for $149.99.
These headphones create a distraction-free environment.
Available colors include black, white, and red.";

pub const SCAFFOLD_PROMPT: &str = "Create a sample expressjs application using the MVC pattern. The application should include:
1. A GET /login route that renders a form with user and password fields
2. A POST \"/login\" route to authenticate the user against mongodb
3. A GET /dashboard route to redirect the user after successful authentication";

pub const SQL_PROMPT: &str = "Generate a list of the students in the student table";
