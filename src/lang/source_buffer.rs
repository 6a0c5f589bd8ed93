use std::{ fmt::{ self,
                  Display,
                  Formatter },
           hash::{ Hash,
                   Hasher } };



/// The location in the source code where a token was found.  Every token carries one so that
/// errors can point the user at the offending text.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, PartialEq, PartialOrd, Eq)]
pub struct SourceLocation
{
    /// Either the path to the script or a description of the source code, for example "\<test\>".
    path: String,

    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 1 based column number in the source code where the token was found.
    column: usize
}


impl Hash for SourceLocation
{
    fn hash<H: Hasher>(&self, state: &mut H)
    {
        self.path.hash(state);
        self.line.hash(state);
        self.column.hash(state);
    }
}


/// Used for error reporting to show where in the source code an error originated.
impl Display for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), fmt::Error>
    {
        write!(formatter, "{} ({}, {})", self.path, self.line, self.column)
    }
}


impl fmt::Debug for SourceLocation
{
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result
    {
        write!(formatter, "{}", self)
    }
}


impl SourceLocation
{
    /// Create a new SourceLocation at the start of the given source.
    pub fn new_from_path(path: &str) -> Self {
        SourceLocation { path: path.to_owned(), line: 1, column: 1 }
    }

    /// The path to the source code or a meaningful description of the source code.
    pub fn path(&self) -> &String
    {
        &self.path
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize
    {
        self.line
    }

    /// The 1 based column number in the source code.
    pub fn column(&self) -> usize
    {
        self.column
    }
}



/// A cursor over source code for the tokenizer.  The lexer rules look at the unconsumed text, and
/// once a rule has matched the buffer is advanced past the matched text, keeping the line and
/// column of the cursor up to date as it goes.
///
/// The SourceBuffer only holds a reference to the source code, the code is not copied.
pub struct SourceBuffer<'a>
{
    /// The full text being tokenized.
    source: &'a str,

    /// Byte offset of the cursor within the source.
    offset: usize,

    /// The logical location of the cursor in the source code.
    location: SourceLocation
}


impl<'a> SourceBuffer<'a>
{
    /// Create a new SourceBuffer with the path to, or meaningful tag for the source code and the
    /// source code itself.
    pub fn new(path: &str, source: &'a str) -> Self {
        SourceBuffer {
            source,
            offset: 0,
            location: SourceLocation::new_from_path(path)
        }
    }

    /// The location the cursor is at in the source code being processed.
    pub fn location(&self) -> &SourceLocation
    {
        &self.location
    }

    /// The text that has not been consumed yet.
    pub fn remaining(&self) -> &'a str
    {
        &self.source[self.offset..]
    }

    /// Has all of the source been consumed?
    pub fn is_exhausted(&self) -> bool
    {
        self.offset >= self.source.len()
    }

    /// Consume the next `length` bytes of text.  The length always comes from a rule match so it
    /// falls on a character boundary.
    pub fn advance(&mut self, length: usize)
    {
        let consumed = &self.source[self.offset..self.offset + length];

        for next in consumed.chars()
        {
            self.increment_location(next);
        }

        self.offset += length;
    }

    /// Increment the location based on the next character.  Advance one column for regular
    /// characters.  Reset the colum to 1 and increment the line for new line characters.
    fn increment_location(&mut self, next: char)
    {
        if next == '\n'
        {
            self.location.line += 1;
            self.location.column = 1;
        }
        else
        {
            self.location.column += 1;
        }
    }
}
