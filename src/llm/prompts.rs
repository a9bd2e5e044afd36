// src/llm/prompts.rs
// Prompt templates for the five content operations. The therapeutic register
// of these prompts is deliberate; do not "tighten" the wording without
// reviewing the tone with the content team.

use crate::types::PosterTheme;

pub fn reframe_prompt(input: &str) -> String {
    format!(
        r#"你是一位温暖、富有同理心的心理咨询师，专门帮助受过欺凌的青少年。
用户输入了一段话： "{input}"
这段话可能是别人对他们说的伤害性语言，或者是他们的自我否定。

请以JSON格式返回以下三个字段（不要使用Markdown代码块，直接返回JSON字符串）：
{{
  "warmExplanation": "用极其温暖、像大哥哥大姐姐一样的口吻安抚用户，解释这句话。",
  "psychAnalysis": "从心理学角度简要分析为什么对方会说这种话（例如对方的投射、嫉妒等），或者为什么用户会有这种自我否定（例如习得性无助）。避免教科书式的枯燥表达，要通俗易懂。",
  "solution": "给出一个非常具体、微小、可执行的行动建议，适合边缘青少年的行为模式。例如：'今天试着戴上耳机听一首喜欢的歌'，而不是'去交新朋友'。"
}}"#
    )
}

/// Image prompt seeded with a short excerpt of the warm explanation.
pub fn healing_image_prompt(warm_explanation: &str) -> String {
    let excerpt: String = warm_explanation.chars().take(50).collect();
    format!(
        "A soft, healing, warm illustration style, dreamlike, pastel colors, \
         cute art style. Concept: {excerpt}. No text in image."
    )
}

pub fn adaptation_prompt(scenario: &str) -> String {
    format!(
        r#"你是一位温柔的青少年成长向导。
用户是一位正在尝试重返校园、曾经受过欺凌的青少年。
他们担心或关注的场景是： "{scenario}"

请以JSON格式返回以下内容（不要使用Markdown）：
{{
  "warmAdvice": "用非常治愈、接纳的语气，告诉用户这种担心是正常的，并给出安抚。",
  "actionStep": "给出一个非常简单、具体、低压力的应对步骤。要适合社恐或敏感时期的青少年去执行。例如：'提前5分钟到教室'，'带一本喜欢的书作为掩护'等。"
}}"#
    )
}

pub fn story_prompt(entries_text: &str) -> String {
    format!(
        r#"以下是一位青少年的日记片段：
{entries_text}

请作为一位治愈系童话作家，将这些日记中的情绪和事件，改编成一个温暖、短小的童话故事。
日记中的困境应该化作故事中的冒险，主角最终获得了勇气或安宁。

请返回JSON格式：
{{
  "title": "故事标题",
  "content": "故事内容（300字以内）"
}}"#
    )
}

pub fn letter_prompt(name: &str, experience: &str) -> String {
    format!(
        r#"你是一位温暖、富有智慧和同理心的青少年成长导师（类似大哥哥/大姐姐的角色）。
在此刻，你要给一位名字叫 {name} 的青少年写一封信。

他/她的经历是：
"{experience}"

信件要求：
1. 根据他的经历，进行温柔的总结，让他感到被看见、被接纳。
2. 对他的痛苦进行安抚，告诉他这不怪他。
3. 给予他力量和疗愈，鼓励他相信未来。
4. 语气要亲切、温暖、真诚，不要有说教感。
5. 字数在 200-300 字左右。
6. 不要使用Markdown格式，直接返回纯文本内容。"#
    )
}

pub fn poster_prompt(theme: PosterTheme) -> &'static str {
    match theme {
        PosterTheme::Completion => {
            "A heartwarming digital illustration of a small boat arriving at a warm, \
             light-filled shore, leaving a dark river behind. A lighthouse or warm cottage \
             light is welcoming them. The scene represents hope, safety, and a new beginning. \
             High quality, artistic style, warm golden lighting."
        }
        PosterTheme::Daily => {
            "A serene and hopeful digital illustration of a small wooden boat floating on a \
             river, holding a glowing warm lantern that lights up the dark water nearby. \
             Soft, healing art style, magical atmosphere."
        }
    }
}
