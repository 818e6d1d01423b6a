// All LLM prompt constants for report synthesis.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Grade instruction for first-year students.
pub const FRESHMAN_INSTRUCTION: &str = r#"**学生处于【大一·奠基期】**
- 战略重点：尽早打破信息差，先把绩点做高；四六级尽快通过；在基础竞赛或课题组中试水科研兴趣。
- "planning" 的阶段依次为：大一下学期、大一暑假、大二上学期。"#;

/// Grade instruction for second-year students.
pub const SOPHOMORE_INSTRUCTION: &str = r#"**学生处于【大二·分水岭期】**
- 战略重点：科研与竞赛的实质性产出，大二结束前至少完成一项校级以上科研或大创项目；六级刷分；绩点不能掉。
- "planning" 的阶段依次为：大二下学期、大二暑假、大三上学期。"#;

/// Grade instruction for third- and fourth-year students.
pub const SENIOR_INSTRUCTION: &str = r#"**学生处于【大三/大四·冲刺期】**
- 战略重点：夏令营精准投递、文书材料（个人陈述/简历）打磨、预推免与面试攻坚。
- "planning" 的阶段依次为：夏令营报名期、夏令营考核期、预推免与九推。"#;

/// Note appended to the school line when the lookup table has a rate.
pub const RATE_KNOWN_NOTE: &str = "（保研率：{rate}%）";

/// Note appended to the school line when the lookup table has no rate.
pub const RATE_MISSING_NOTE: &str =
    "（内部数据库暂无该校保研率，请依据你的知识补充 missingData 字段）";

/// `missingData` schema when the generator must backfill school facts.
pub const MISSING_DATA_REQUESTED: &str = r#"{
    "rate": 12.5,
    "policy": "字符串：该校推免政策核心要点",
    "destinations": ["往届学长学姐的具体去向院校，不少于3个"]
  }"#;

/// `missingData` schema when the school table already has the facts.
pub const MISSING_DATA_NOT_REQUESTED: &str = "null";

pub const MISSING_DATA_RULE_REQUESTED: &str = "4. **missingData**：必须填写。rate 为数字（最近一届保研率百分比，如 12.5），policy 为字符串，destinations 为字符串数组。";
pub const MISSING_DATA_RULE_NOT_REQUESTED: &str = "4. **missingData**：固定返回 null。";

/// Report synthesis prompt template.
/// Replace: {school}, {rate_note}, {major}, {grade}, {rank}, {english}, {competition},
///          {research}, {focus}, {destinations}, {policy}, {grade_instruction},
///          {missing_data_schema}, {missing_data_rule}
pub const REPORT_PROMPT_TEMPLATE: &str = r#"你是一位有十年经验的保研规划师，说话直接、专业、不说空话。请根据下面的学生档案生成一份结构化的保研规划报告。

学生档案：
- 本科院校：{school}{rate_note}
- 专业方向：{major}
- 当前年级：{grade}
- 绩点排名：{rank}
- 英语水平：{english}
- 竞赛获奖：{competition}
- 科研经历：{research}
- 咨询重点：{focus}

本校保研去向（官方数据）：{destinations}
本校推免政策：{policy}

{grade_instruction}

只返回一个 JSON 对象，字段名与结构必须与下面完全一致（不要 Markdown，不要代码块）：
{
  "swot": {
    "strengths": ["3-4 条核心优势"],
    "weaknesses": ["3-4 条核心劣势"],
    "opportunities": ["3-4 条外部机会"],
    "threats": ["3-4 条外部威胁"]
  },
  "bonusScheme": [
    {
      "category": "加分类别，如：学术论文",
      "items": [
        { "item": "加分项目", "score": "加分分值，如：加 1-2分", "desc": "认定条件" }
      ]
    }
  ],
  "planning": [
    {
      "stage": "阶段名称（具体时间段）",
      "categoryContent": { "gpa": "...", "english": "...", "research": "...", "contest": "..." }
    }
  ],
  "researchAdvice": "字符串，200字以内，可换行：1. 推荐研究方向 2. 推荐投稿期刊/会议 3. 联系导师的技巧",
  "competitions": "字符串：最值得参加的3个竞赛，每个一句话说明含金量",
  "targetSchools": {
    "冲刺院校": "2-3所，格式为“校名（专业）”，说明为何是冲刺",
    "稳妥院校": "2-3所，格式为“校名（专业）”，说明匹配理由",
    "保底院校": "2-3所，格式为“校名（专业）”，说明理由"
  },
  "admissionCases": [
    { "student": "王同学", "school": "同层次高校", "major": "{major}", "gpa": "3.8/4.0 (Rank 5%)", "english": "六级 560", "offer": "录取院校" }
  ],
  "missingData": {missing_data_schema}
}

硬性要求：
1. admissionCases 恰好 3 个，与该生同层次、同专业；背景弱就给“逆袭”案例，背景强就给“冲刺”案例。
2. bonusScheme 依照该校实际加分习惯，写得具体可信。
3. planning 每个阶段的四个字段都必须是字符串。
{missing_data_rule}"#;
